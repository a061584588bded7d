//! Per-job pipeline: fetch info, plan, download, then render each segment.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{warn, Instrument};

use shorts_media::{
    normalize_segment, plan_segments, FaceDetector, FaceLocator, FfmpegFrameSampler, FfmpegTranscoder,
    FrameSampler, SegmentConfig, TextPlacementEstimator, Transcoder, VideoSource, YtDlpSource,
    YuNetDetector,
};
use shorts_models::{JobId, JobRecord, Segment, ShortClip};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::job_store::{update_job, JobStore};
use crate::logging::JobLogger;
use crate::metrics;

/// Runs a job's pipeline against the configured ports and records its progress.
pub struct ShortsProcessor {
    config: WorkerConfig,
    store: Arc<dyn JobStore>,
    source: Arc<dyn VideoSource>,
    sampler: Arc<dyn FrameSampler>,
    transcoder: Arc<dyn Transcoder>,
    locator: FaceLocator,
}

impl ShortsProcessor {
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn JobStore>,
        source: Arc<dyn VideoSource>,
        sampler: Arc<dyn FrameSampler>,
        transcoder: Arc<dyn Transcoder>,
        detector: Arc<dyn FaceDetector>,
    ) -> Self {
        Self {
            config,
            store,
            source,
            sampler,
            transcoder,
            locator: FaceLocator::new(detector),
        }
    }

    /// Processor over yt-dlp, FFmpeg and YuNet.
    pub fn from_config(config: WorkerConfig, store: Arc<dyn JobStore>) -> Self {
        let transcoder = FfmpegTranscoder::new(config.encoding.clone())
            .with_timeout(config.ffmpeg_timeout.as_secs());
        let detector = YuNetDetector::new(config.face_detector());
        Self::new(
            config,
            store,
            Arc::new(YtDlpSource::new()),
            Arc::new(FfmpegFrameSampler::new()),
            Arc::new(transcoder),
            Arc::new(detector),
        )
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the job to a terminal state and return its final record.
    ///
    /// Pipeline failures are recorded on the job; only a missing record is an error.
    pub async fn run(&self, job_id: &JobId) -> WorkerResult<JobRecord> {
        let record = update_job(self.store.as_ref(), job_id, |j| j.start())
            .await
            .ok_or_else(|| WorkerError::JobNotFound(job_id.to_string()))?;

        let logger = JobLogger::new(job_id, "shorts");
        let span = logger.create_span();

        async {
            logger.log_start(&record.video_url);
            let started = Instant::now();

            let outcome = self.process(&record, &logger).await;
            let elapsed = started.elapsed().as_secs_f64();

            let final_record = match outcome {
                Ok(shorts) => {
                    let count = shorts.len();
                    metrics::record_job_completed(elapsed);
                    logger.log_completion(&format!("{} shorts in {:.1}s", count, elapsed));
                    update_job(self.store.as_ref(), job_id, move |j| j.complete(shorts)).await
                }
                Err(e) => {
                    let reason = if e.is_input_error() { "input" } else { "processing" };
                    metrics::record_job_failed(reason, elapsed);
                    logger.log_error(&e.to_string());
                    let message = e.to_string();
                    update_job(self.store.as_ref(), job_id, move |j| j.fail(message)).await
                }
            };

            remove_frames_dir(&self.config.frames_dir(job_id)).await;

            final_record.ok_or_else(|| WorkerError::JobNotFound(job_id.to_string()))
        }
        .instrument(span)
        .await
    }

    async fn process(&self, record: &JobRecord, logger: &JobLogger) -> WorkerResult<Vec<ShortClip>> {
        let job_id = &record.id;
        let url = record.video_url.as_str();

        self.set_step(job_id, "fetching video info").await;
        let info = self.source.fetch_info(url).await?;
        let title = info.title.clone();
        update_job(self.store.as_ref(), job_id, move |j| j.video_title = Some(title)).await;

        // Planning happens before the download so short videos fail fast
        let segments = plan_segments(info.duration_seconds, &self.config.segment)?;
        let total = segments.len();
        update_job(self.store.as_ref(), job_id, move |j| j.set_segments_total(total)).await;
        logger.log_progress(&format!(
            "planned {} segments for {:.1}s video",
            total, info.duration_seconds
        ));

        let job_dir = self.config.job_dir(job_id);
        tokio::fs::create_dir_all(&job_dir).await?;

        self.set_step(job_id, "downloading video").await;
        let video = self.source.fetch_file(url, &info.id, &job_dir).await?;

        let estimator = TextPlacementEstimator::new(
            Arc::clone(&self.sampler),
            self.locator.clone(),
            self.config.caption,
        )
        .with_frames_dir(self.config.frames_dir(job_id));

        let mut shorts = Vec::with_capacity(total);
        for (index, candidate) in segments.into_iter().enumerate() {
            let segment = bounded_segment(candidate, info.duration_seconds, &self.config.segment)?;
            let output = job_dir.join(format!("short_{}.mp4", index + 1));

            self.set_step(job_id, &format!("rendering short {}/{}", index + 1, total))
                .await;
            self.transcoder.transcode(&video, segment, &output).await?;

            self.set_step(job_id, &format!("placing captions {}/{}", index + 1, total))
                .await;
            let text_placement = estimator
                .estimate(&video, segment.start, segment.duration())
                .await;

            shorts.push(ShortClip {
                index,
                path: output,
                segment,
                text_placement,
            });
            update_job(self.store.as_ref(), job_id, |j| j.record_segment_done()).await;
            metrics::record_segment_rendered();
            logger.log_progress(&format!(
                "short {}/{} rendered for {} (caption at {:.2})",
                index + 1,
                total,
                segment,
                text_placement.value()
            ));
        }

        Ok(shorts)
    }

    async fn set_step(&self, job_id: &JobId, step: &str) {
        let step = step.to_string();
        update_job(self.store.as_ref(), job_id, move |j| j.set_step(step)).await;
    }
}

/// Normalize a planned window and enforce `0 <= start < end <= duration`.
fn bounded_segment(candidate: Segment, duration: f64, config: &SegmentConfig) -> WorkerResult<Segment> {
    let segment = normalize_segment(candidate, duration, config);
    Ok(Segment::checked(segment.start, segment.end, duration)?)
}

async fn remove_frames_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to remove frames directory"),
    }
}
