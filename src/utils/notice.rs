use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a transient notice stays visible before auto-dismissing.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

/// A single user-visible transient notice ("file too large", "microphone
/// unavailable"). Posting replaces any notice currently shown; every notice
/// dismisses itself after [`DISMISS_AFTER`].
///
/// The rendering layer only ever reads [`Notices::current`]; it never clears
/// notices itself.
#[derive(Clone, Default)]
pub struct Notices {
    current: Arc<Mutex<Option<String>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` and schedule its dismissal.
    pub fn post(&self, text: impl Into<String>) {
        let text = text.into();
        *self.current.lock().unwrap() = Some(text.clone());

        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            let mut slot = current.lock().unwrap();
            // A newer notice may have replaced this one; leave it alone.
            if slot.as_deref() == Some(text.as_str()) {
                *slot = None;
            }
        });
    }

    /// The notice currently on screen, if any.
    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }
}
