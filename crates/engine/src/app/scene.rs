use super::input::KeyId;
use super::view::FrameView;

/// A running game as the loop sees it.
///
/// Key callbacks are applied as soon as the window reports them; `tick` runs once
/// per fixed simulation step. Both happen on the loop thread, never concurrently.
pub trait Scene {
    fn load(&mut self);
    fn key_down(&mut self, key: KeyId, repeat: bool);
    fn key_up(&mut self, key: KeyId);
    /// Pointer activation of the popup's close control.
    fn activate_close_control(&mut self);
    fn tick(&mut self);
    fn frame_view(&self) -> FrameView;
    fn unload(&mut self) {}
    fn debug_title(&self) -> Option<String> {
        None
    }
}
