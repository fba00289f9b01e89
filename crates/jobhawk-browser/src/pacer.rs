use crate::driver::DriverSession;
use crate::Result;
use chromiumoxide::Element;
use rand::Rng;
use std::ops::Range;
use std::time::Duration;
use tokio::time::sleep;

/// Characters that get an extra pause after them when typing, the way a
/// person slows down at word and structural boundaries.
const BOUNDARY_CHARS: [char; 4] = [' ', '.', '@', '_'];

/// Delay categories used between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Between small interactions, e.g. moving to the next field.
    Short,
    /// Between page-level actions.
    Normal,
    /// Page settle after navigation or search submission.
    Long,
}

/// Millisecond ranges every pacing decision draws from.
#[derive(Debug, Clone)]
pub struct PaceProfile {
    pub short_ms: Range<u64>,
    pub normal_ms: Range<u64>,
    pub long_ms: Range<u64>,
    pub keystroke_ms: Range<u64>,
    pub boundary_ms: Range<u64>,
    pub hesitation_ms: Range<u64>,
    pub scroll_pause_ms: Range<u64>,
}

impl PaceProfile {
    /// Human-scale pacing.
    pub fn human() -> Self {
        Self {
            short_ms: 500..4_000,
            normal_ms: 2_000..8_000,
            long_ms: 5_000..20_000,
            keystroke_ms: 50..300,
            boundary_ms: 200..700,
            hesitation_ms: 3_000..10_000,
            scroll_pause_ms: 1_000..4_000,
        }
    }

    /// Zero-duration pacing for deterministic tests.
    pub fn zero() -> Self {
        Self {
            short_ms: 0..0,
            normal_ms: 0..0,
            long_ms: 0..0,
            keystroke_ms: 0..0,
            boundary_ms: 0..0,
            hesitation_ms: 0..0,
            scroll_pause_ms: 0..0,
        }
    }
}

/// A scroll sequence decided up front, so no RNG is held across an await.
#[derive(Debug)]
struct ScrollPlan {
    /// Downward increments in pixels, each with a trailing pause.
    steps: Vec<(i64, Duration)>,
    /// Small corrective upward scroll, present about half the time.
    correction: Option<(i64, Duration)>,
}

/// Produces the randomized pacing that makes a session's interaction
/// pattern look like a person at a keyboard. Consumes time, never fails.
pub struct Pacer {
    profile: PaceProfile,
}

impl Pacer {
    pub fn human() -> Self {
        Self::with_profile(PaceProfile::human())
    }

    pub fn zero() -> Self {
        Self::with_profile(PaceProfile::zero())
    }

    pub fn with_profile(profile: PaceProfile) -> Self {
        Self { profile }
    }

    /// Sample the duration for a delay category.
    pub fn pick(&self, delay: Delay) -> Duration {
        let range = match delay {
            Delay::Short => &self.profile.short_ms,
            Delay::Normal => &self.profile.normal_ms,
            Delay::Long => &self.profile.long_ms,
        };
        sample(range)
    }

    /// Suspend the caller for a category-specific random duration.
    pub async fn delay(&self, delay: Delay) {
        let duration = self.pick(delay);
        tracing::debug!("Pacing {:?} for {:?}", delay, duration);
        sleep(duration).await;
    }

    /// Send text to a field one character at a time with per-keystroke
    /// delays and longer pauses after boundary characters.
    pub async fn type_like_human(&self, field: &Element, text: &str) -> Result<()> {
        for ch in text.chars() {
            field.type_str(ch.to_string()).await?;
            sleep(sample(&self.profile.keystroke_ms)).await;
            if BOUNDARY_CHARS.contains(&ch) {
                sleep(sample(&self.profile.boundary_ms)).await;
            }
        }
        Ok(())
    }

    /// With the given probability, hesitate for a long moment. Used before
    /// high-stakes actions such as submitting credentials.
    pub async fn maybe_extra_pause(&self, probability: f64) {
        if self.roll(probability) {
            let duration = sample(&self.profile.hesitation_ms);
            tracing::debug!("Hesitating for {:?}", duration);
            sleep(duration).await;
        }
    }

    /// A biased coin flip.
    pub fn roll(&self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Scroll down in 1-3 randomized increments, sometimes correcting back
    /// up a little afterwards.
    pub async fn scroll(&self, session: &DriverSession) -> Result<()> {
        let plan = self.scroll_plan();
        for (pixels, pause) in &plan.steps {
            session.scroll_by(*pixels).await?;
            sleep(*pause).await;
        }
        if let Some((pixels, pause)) = plan.correction {
            session.scroll_by(pixels).await?;
            sleep(pause).await;
        }
        Ok(())
    }

    fn scroll_plan(&self) -> ScrollPlan {
        let mut rng = rand::thread_rng();
        let steps = (0..rng.gen_range(1..=3))
            .map(|_| {
                (
                    rng.gen_range(200..=500),
                    sample_with(&mut rng, &self.profile.scroll_pause_ms),
                )
            })
            .collect();
        let correction = rng
            .gen_bool(0.5)
            .then(|| (-200, sample_with(&mut rng, &self.profile.scroll_pause_ms)));

        ScrollPlan { steps, correction }
    }
}

fn sample(range: &Range<u64>) -> Duration {
    sample_with(&mut rand::thread_rng(), range)
}

fn sample_with(rng: &mut impl Rng, range: &Range<u64>) -> Duration {
    let ms = if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    };
    Duration::from_millis(ms)
}
