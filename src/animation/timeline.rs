//! Ordered, single-pass sequence of timed steps
//!
//! A [`Timeline`] is plain data: each step has a duration and an optional cue
//! that fires when the step starts. Step start offsets are the running sum of
//! the durations before them, so a step's duration only delays the step after
//! it. A [`TimelinePlayer`] replays the list once, forward only, against
//! whatever clock time it is handed.

/// One entry of the sequence
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStep<C> {
    pub label: &'static str,
    pub cue: Option<C>,
    /// Offset from the timeline origin, in seconds
    pub start: f32,
    pub duration: f32,
}

/// Immutable list of steps laid end to end
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<C> {
    steps: Vec<TimelineStep<C>>,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step whose cue fires when it starts (builder pattern)
    pub fn then(self, label: &'static str, duration: f32, cue: C) -> Self {
        self.push(label, duration, Some(cue))
    }

    /// Appends a step that only occupies time (builder pattern)
    pub fn pause(self, label: &'static str, duration: f32) -> Self {
        self.push(label, duration, None)
    }

    fn push(mut self, label: &'static str, duration: f32, cue: Option<C>) -> Self {
        let start = self.duration();
        self.steps.push(TimelineStep {
            label,
            cue,
            start,
            duration: duration.max(0.0),
        });
        self
    }

    pub fn steps(&self) -> &[TimelineStep<C>] {
        &self.steps
    }

    /// Total length of the sequence in seconds
    pub fn duration(&self) -> f32 {
        self.steps
            .last()
            .map(|step| step.start + step.duration)
            .unwrap_or(0.0)
    }
}

/// A cue whose step has started
#[derive(Debug, Clone, PartialEq)]
pub struct FiredCue<C> {
    pub index: usize,
    pub label: &'static str,
    /// Clock time the step was scheduled to start at
    pub at: f32,
    pub duration: f32,
    pub cue: C,
}

/// Plays a timeline once against an external clock
#[derive(Debug)]
pub struct TimelinePlayer<C> {
    timeline: Timeline<C>,
    origin: f32,
    next: usize,
}

impl<C: Clone> TimelinePlayer<C> {
    /// Starts playback with step 0 anchored at clock time `origin`
    pub fn new(timeline: Timeline<C>, origin: f32) -> Self {
        Self {
            timeline,
            origin,
            next: 0,
        }
    }

    /// Starts every step whose start time has been reached
    ///
    /// Returns the cues of the started steps in declaration order. Steps never
    /// start twice; a large jump in `now` starts all steps it passes, still in
    /// order.
    pub fn advance(&mut self, now: f32) -> Vec<FiredCue<C>> {
        let mut fired = Vec::new();

        while let Some(step) = self.timeline.steps.get(self.next) {
            let at = self.origin + step.start;
            if at > now {
                break;
            }

            if let Some(cue) = &step.cue {
                fired.push(FiredCue {
                    index: self.next,
                    label: step.label,
                    at,
                    duration: step.duration,
                    cue: cue.clone(),
                });
            }
            self.next += 1;
        }

        fired
    }

    /// Number of steps started so far
    pub fn started_steps(&self) -> usize {
        self.next
    }

    /// True once every step has started and the last one has run its course
    pub fn is_finished(&self, now: f32) -> bool {
        self.next == self.timeline.steps.len() && now >= self.origin + self.timeline.duration()
    }

    pub fn timeline(&self) -> &Timeline<C> {
        &self.timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Timeline<u32> {
        Timeline::new()
            .then("one", 2.0, 1)
            .pause("rest", 1.0)
            .then("two", 2.0, 2)
            .then("three", 3.0, 3)
    }

    #[test]
    fn start_offsets_accumulate_durations() {
        let timeline = sample();
        let starts: Vec<f32> = timeline.steps().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.0, 2.0, 3.0, 5.0]);
        assert_eq!(timeline.duration(), 8.0);
    }

    #[test]
    fn cues_fire_at_step_start_and_only_once() {
        let mut player = TimelinePlayer::new(sample(), 0.0);

        let first = player.advance(0.0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].cue, 1);

        assert!(player.advance(2.9).is_empty());

        let second = player.advance(3.0);
        assert_eq!(second.iter().map(|f| f.cue).collect::<Vec<_>>(), vec![2]);
        assert!(player.advance(3.5).is_empty());
    }

    #[test]
    fn large_jump_fires_pending_cues_in_order() {
        let mut player = TimelinePlayer::new(sample(), 1.0);
        let fired = player.advance(100.0);

        assert_eq!(fired.iter().map(|f| f.cue).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(fired.iter().map(|f| f.at).collect::<Vec<_>>(), vec![1.0, 4.0, 6.0]);
        for pair in fired.windows(2) {
            assert!(pair[1].at - pair[0].at >= pair[0].duration);
        }
        assert!(player.is_finished(100.0));
    }

    #[test]
    fn not_finished_until_last_duration_elapses() {
        let mut player = TimelinePlayer::new(sample(), 0.0);
        player.advance(5.0);
        assert_eq!(player.started_steps(), 4);
        assert!(!player.is_finished(7.9));
        assert!(player.is_finished(8.0));
    }
}
