use crate::error::MessageResult;

/// Outbound channel to the companion app.
pub trait Outbox {
    /// Queue an encoded dictionary. `Ok` means queued; delivery is reported later through
    /// [`EventHandler::on_send_succeeded`](crate::EventHandler::on_send_succeeded) or
    /// [`EventHandler::on_send_failed`](crate::EventHandler::on_send_failed).
    fn send(&mut self, message: &[u8]) -> Result<(), MessageResult>;
}
