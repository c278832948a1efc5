use std::sync::{Mutex, PoisonError};

use sunclock_core::{ScreenClosed, ScreenResponse};

/// Configuration-screen state that outlives a single event.
///
/// Holds the last real page response so a host-cancelled webview can
/// repeat it.
#[derive(Debug, Default)]
pub struct Session {
    last_real_response: Mutex<Option<ScreenResponse>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The response to act on for a closed screen.
    ///
    /// A real response is remembered and returned. `Cancelled` is replaced by
    /// the remembered response, or yields `None` when there is none yet.
    pub fn resolve(&self, closed: ScreenClosed) -> Option<ScreenResponse> {
        let mut last = self
            .last_real_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match closed {
            ScreenClosed::Response(response) => {
                *last = Some(response.clone());
                Some(response)
            }
            ScreenClosed::Cancelled => last.clone(),
        }
    }

    #[must_use]
    pub fn last_real_response(&self) -> Option<ScreenResponse> {
        self.last_real_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
