//! Background reminder scheduler.
//!
//! A single periodic task scans for lessons whose start time falls inside the
//! dispatch window (10 to 30 minutes ahead by default) and sends at most one
//! reminder per lesson. The persisted `status` column is the coordination
//! point: PENDING lessons are dispatched, SENT lessons are skipped, and the
//! PENDING → SENT transition is a compare-and-set against the `updated_at`
//! value observed when the window was scanned, so a concurrent edit (which
//! resets the lesson to PENDING with a fresh `updated_at`) always wins.
//!
//! Delivery failures leave the lesson PENDING; the next tick retries it for
//! as long as the lesson stays inside the window. Known limitations, accepted
//! by design: a lesson can leave the window unreminded if every attempt
//! fails, and running two scheduler instances would double-send because
//! dispatch is not guarded by any cross-process lock.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};
use tracing::{debug, error, info, warn};

use crate::config::scheduler::SchedulerConfig;
use crate::utils::email::NotificationGateway;
use crate::utils::errors::AppError;

/// A pending lesson inside the dispatch window, joined with its owner.
/// `updated_at` is the version observed at scan time, used for the CAS write.
#[derive(Debug, sqlx::FromRow)]
struct DueLesson {
    id: i32,
    title: String,
    start_time: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    email: String,
    first_name: String,
}

pub struct ReminderScheduler {
    db: PgPool,
    gateway: Arc<dyn NotificationGateway>,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    pub fn new(db: PgPool, gateway: Arc<dyn NotificationGateway>, config: SchedulerConfig) -> Self {
        Self {
            db,
            gateway,
            config,
        }
    }

    /// Starts the periodic loop. The task stops after `shutdown` flips; an
    /// in-flight tick always runs to completion first.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let Self {
            db,
            gateway,
            config,
        } = self;

        info!(
            interval_secs = config.tick_interval_secs,
            window_start_mins = config.window_start_mins,
            window_end_mins = config.window_end_mins,
            "Starting lesson reminder scheduler"
        );

        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(config.tick_interval_secs));

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if let Err(err) = run_tick(&db, gateway.as_ref(), &config, Utc::now()).await {
                            error!(error = %err.error, "Reminder tick failed");
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("Reminder scheduler stopping");
                        break;
                    }
                }
            }
        })
    }
}

/// One scheduler pass at time `now`.
///
/// The clock is a parameter so tests can drive the window directly; the
/// periodic loop always passes `Utc::now()`. Errors per lesson are contained:
/// a failed send or a failed status write is logged and the remaining lessons
/// in the tick are still processed.
pub async fn run_tick(
    db: &PgPool,
    gateway: &dyn NotificationGateway,
    config: &SchedulerConfig,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let window_start = now + ChronoDuration::minutes(config.window_start_mins);
    let window_end = now + ChronoDuration::minutes(config.window_end_mins);

    let due_lessons = sqlx::query_as::<_, DueLesson>(
        "SELECT l.id, l.title, l.start_time, l.updated_at, u.email, u.first_name
         FROM lessons l
         JOIN users u ON u.id = l.teacher_id
         WHERE l.start_time >= $1 AND l.start_time < $2 AND l.status = 'pending'",
    )
    .bind(window_start)
    .bind(window_end)
    .fetch_all(db)
    .await?;

    if due_lessons.is_empty() {
        debug!("No pending lessons in the reminder window");
        return Ok(());
    }

    for lesson in due_lessons {
        let sent = gateway
            .send_lesson_reminder(
                &lesson.email,
                &lesson.first_name,
                &lesson.title,
                lesson.start_time,
                config.window_end_mins,
            )
            .await;

        if let Err(err) = sent {
            // Leave the lesson PENDING; the next tick retries while the
            // lesson is still inside the window.
            warn!(
                lesson_id = lesson.id,
                error = %err.error,
                "Failed to send lesson reminder, will retry next tick"
            );
            continue;
        }

        // Compare-and-set on the version read at scan time: if the lesson
        // was edited since (status reset, new updated_at), the edit wins and
        // the lesson will be re-reminded for its new content.
        let update = sqlx::query(
            "UPDATE lessons
             SET status = 'sent', updated_at = NOW()
             WHERE id = $1 AND status = 'pending' AND updated_at = $2",
        )
        .bind(lesson.id)
        .bind(lesson.updated_at)
        .execute(db)
        .await;

        match update {
            Ok(result) if result.rows_affected() == 0 => {
                debug!(
                    lesson_id = lesson.id,
                    "Lesson changed during dispatch, leaving status untouched"
                );
            }
            Ok(_) => {
                info!(lesson_id = lesson.id, title = %lesson.title, "Reminder sent");
            }
            Err(err) => {
                warn!(
                    lesson_id = lesson.id,
                    error = %err,
                    "Failed to persist reminder status"
                );
            }
        }
    }

    Ok(())
}
