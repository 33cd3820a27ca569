//! Microphone capture and WAV encoding.
//!
//! `CpalRecorder` is only built with the `microphone` feature. The cpal stream
//! is `!Send`, so it is created and held on a dedicated thread that runs until
//! the shared recording flag is cleared.

use hound::{SampleFormat, WavSpec, WavWriter};
use postcraft_core::error::{PostcraftError, Result};
use std::io::Cursor;

/// Capture rate sent to the transcription endpoint.
pub const SAMPLE_RATE: u32 = 16_000;

/// Encodes mono `f32` samples as 16-bit PCM WAV.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| PostcraftError::internal(format!("WAV write error: {e}")))?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * i16::MAX as f32) as i16)
                .map_err(|e| PostcraftError::internal(format!("Sample write error: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| PostcraftError::internal(format!("WAV finalize error: {e}")))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(feature = "microphone")]
pub use self::cpal_backend::CpalRecorder;

#[cfg(feature = "microphone")]
mod cpal_backend {
    use super::{SAMPLE_RATE, encode_wav};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use postcraft_core::error::{PostcraftError, Result};
    use postcraft_core::recording::{AudioClip, AudioRecorder};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, mpsc};
    use std::thread::JoinHandle;
    use std::time::Duration;

    const STARTUP_TIMEOUT: Duration = Duration::from_secs(3);

    /// Records from the default input device.
    pub struct CpalRecorder {
        recording: Arc<AtomicBool>,
        samples: Arc<Mutex<Vec<f32>>>,
        worker: Option<JoinHandle<()>>,
    }

    impl CpalRecorder {
        pub fn new() -> Self {
            Self {
                recording: Arc::new(AtomicBool::new(false)),
                samples: Arc::new(Mutex::new(Vec::new())),
                worker: None,
            }
        }

        fn join_worker(&mut self) {
            self.recording.store(false, Ordering::SeqCst);
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    tracing::error!("Audio capture thread panicked");
                }
            }
        }

        fn take_samples(&self) -> Result<Vec<f32>> {
            let mut samples = self
                .samples
                .lock()
                .map_err(|e| PostcraftError::internal(format!("Lock error: {e}")))?;
            Ok(std::mem::take(&mut *samples))
        }
    }

    impl Default for CpalRecorder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioRecorder for CpalRecorder {
        fn start(&mut self) -> Result<()> {
            if self.recording.load(Ordering::SeqCst) {
                return Err(PostcraftError::busy("recording"));
            }
            self.take_samples()?;
            self.recording.store(true, Ordering::SeqCst);

            let recording = self.recording.clone();
            let samples = self.samples.clone();
            let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<(), String>>();

            let worker = std::thread::spawn(move || {
                let host = cpal::default_host();
                let Some(device) = host.default_input_device() else {
                    let _ = ready_tx.send(Err("No input device found".to_string()));
                    return;
                };

                let config = cpal::StreamConfig {
                    channels: 1,
                    sample_rate: cpal::SampleRate(SAMPLE_RATE),
                    buffer_size: cpal::BufferSize::Default,
                };

                let flag = recording.clone();
                let stream = match device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if flag.load(Ordering::SeqCst) {
                            if let Ok(mut buffer) = samples.lock() {
                                buffer.extend_from_slice(data);
                            }
                        }
                    },
                    |err| tracing::error!("Audio input error: {}", err),
                    None,
                ) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("Stream build failed: {e}")));
                        return;
                    }
                };

                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(format!("Stream play failed: {e}")));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                while recording.load(Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(50));
                }
                drop(stream);
            });
            self.worker = Some(worker);

            let started = ready_rx
                .recv_timeout(STARTUP_TIMEOUT)
                .unwrap_or_else(|_| Err("Timed out opening the microphone".to_string()));
            if let Err(detail) = started {
                self.join_worker();
                tracing::warn!("Microphone unavailable: {}", detail);
                return Err(PostcraftError::permission(detail));
            }

            tracing::info!(sample_rate = SAMPLE_RATE, "Recording started");
            Ok(())
        }

        fn stop(&mut self) -> Result<AudioClip> {
            self.join_worker();
            let samples = self.take_samples()?;
            if samples.is_empty() {
                return Err(PostcraftError::validation("No audio recorded"));
            }
            tracing::info!(samples = samples.len(), "Recording stopped");
            Ok(AudioClip::wav(encode_wav(&samples, SAMPLE_RATE)?))
        }

        fn cancel(&mut self) {
            self.join_worker();
            let _ = self.take_samples();
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }
    }

    impl Drop for CpalRecorder {
        fn drop(&mut self) {
            self.join_worker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wav_header_and_samples() {
        let bytes = encode_wav(&[0.0, 0.5, -0.5, 2.0], SAMPLE_RATE).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![0, 16383, -16383, i16::MAX]);
    }
}
