/// Implemented by whatever reacts to host input, one event at a time.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
