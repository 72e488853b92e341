/// A one-shot deferred command.
///
/// UI code arms the slot with [`request`](Self::request); the owning session
/// drains it with [`take`](Self::take) exactly once per cycle, before any
/// UI is built, and only then runs the side effect. Taking empties the slot
/// first, so the side effect may re-arm any slot (this one included) without
/// being re-entered.
#[derive(Debug)]
pub struct CommandSlot<T> {
    name: &'static str,
    payload: Option<T>,
}

impl<T> CommandSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    /// Arm the slot. A command still pending is replaced.
    pub fn request(&mut self, payload: T) {
        if self.payload.is_some() {
            tracing::debug!(slot = self.name, "replacing pending command");
        } else {
            tracing::debug!(slot = self.name, "command requested");
        }
        self.payload = Some(payload);
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    /// Disarm the slot and hand back its payload, if any.
    pub fn take(&mut self) -> Option<T> {
        let payload = self.payload.take();
        if payload.is_some() {
            tracing::debug!(slot = self.name, "command drained");
        }
        payload
    }
}
