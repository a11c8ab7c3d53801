//! Platform-agnostic media element trait
//!
//! Abstracts the `<video>` element (or any player) the session controls.

/// Handle to the media element of one playback context
///
/// Methods take `&self`: the element is owned by the host page and shared
/// between the session and its autosave task, so implementors provide their
/// own interior mutability.
pub trait MediaElement: Send + Sync {
    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Seek to `seconds`
    fn set_current_time(&self, seconds: f64);

    /// Total duration in seconds
    ///
    /// `NaN` (or zero) while metadata is still loading.
    fn duration(&self) -> f64;

    /// Whether playback is paused
    fn is_paused(&self) -> bool;

    /// Start or resume playback
    fn play(&self);

    /// Pause playback
    fn pause(&self);

    /// Set the playback rate (1.0 = normal)
    fn set_playback_rate(&self, rate: f64);
}
