use log::trace;

/// How much of the canvas a render request needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderKind {
    /// Selection or draft changed; the composition is still valid
    OverlayOnly,
    /// Objects or image changed; recomposite the base as well
    Full,
}

/// Holds at most one pending render for the next paint.
///
/// A newer request supersedes the pending one, but a pending full render is
/// never downgraded to overlay-only.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Option<RenderKind>,
    superseded: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, kind: RenderKind) {
        self.pending = Some(match self.pending {
            Some(previous) => {
                self.superseded += 1;
                trace!("Render request {previous:?} superseded by {kind:?}");
                previous.max(kind)
            }
            None => kind,
        });
    }

    /// Hands out the pending request, leaving nothing scheduled
    pub fn take(&mut self) -> Option<RenderKind> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<RenderKind> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Number of requests that were replaced before they ran
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pending_request() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request(RenderKind::OverlayOnly);
        scheduler.request(RenderKind::OverlayOnly);
        assert_eq!(scheduler.superseded_count(), 1);
        assert_eq!(scheduler.take(), Some(RenderKind::OverlayOnly));
        assert_eq!(scheduler.take(), None);
    }

    #[test]
    fn test_full_is_never_downgraded() {
        let mut scheduler = RenderScheduler::new();
        scheduler.request(RenderKind::Full);
        scheduler.request(RenderKind::OverlayOnly);
        assert_eq!(scheduler.pending(), Some(RenderKind::Full));

        scheduler.cancel();
        scheduler.request(RenderKind::OverlayOnly);
        scheduler.request(RenderKind::Full);
        assert_eq!(scheduler.take(), Some(RenderKind::Full));
    }
}
