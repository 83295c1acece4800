use crate::events::{MouseEvent, MouseEventKind};
use crate::trace_if_enabled;

use super::buffer::{EventBuffer, DEFAULT_CAPACITY};

/// Состояние мыши окна и очередь её событий.
///
/// Каждая мутация сначала обновляет состояние, затем кладёт в очередь
/// снимок уже обновлённого состояния.
#[derive(Debug)]
pub struct Mouse {
    x: i32,
    y: i32,
    left_is_pressed: bool,
    right_is_pressed: bool,
    is_in_window: bool,
    buffer: EventBuffer<MouseEvent>,
}

impl Mouse {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            left_is_pressed: false,
            right_is_pressed: false,
            is_in_window: false,
            buffer: EventBuffer::new(capacity),
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn is_in_window(&self) -> bool {
        self.is_in_window
    }

    pub fn left_is_pressed(&self) -> bool {
        self.left_is_pressed
    }

    pub fn right_is_pressed(&self) -> bool {
        self.right_is_pressed
    }

    pub fn any_button_pressed(&self) -> bool {
        self.left_is_pressed || self.right_is_pressed
    }

    /// Извлечь самое старое событие или `Invalid`, если очередь пуста
    pub fn read(&mut self) -> MouseEvent {
        self.buffer.pop().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn flush(&mut self) {
        self.buffer.clear();
    }

    pub fn queued(&self) -> usize {
        self.buffer.len()
    }

    fn snapshot(&self, kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            left_down: self.left_is_pressed,
            right_down: self.right_is_pressed,
            x: self.x,
            y: self.y,
        }
    }

    fn push(&mut self, kind: MouseEventKind) {
        let event = self.snapshot(kind);
        let evicted = self.buffer.push(event);
        if evicted > 0 {
            trace_if_enabled!("Очередь мыши переполнена, вытеснено {} событий", evicted);
        }
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

// Мутации состояния: только для диспетчера окна
impl Mouse {
    pub(crate) fn on_mouse_move(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.push(MouseEventKind::Move);
    }

    pub(crate) fn on_mouse_enter(&mut self) {
        self.is_in_window = true;
        self.push(MouseEventKind::Enter);
    }

    pub(crate) fn on_mouse_leave(&mut self) {
        self.is_in_window = false;
        self.push(MouseEventKind::Leave);
    }

    pub(crate) fn on_left_pressed(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.left_is_pressed = true;
        self.push(MouseEventKind::LeftPress);
    }

    pub(crate) fn on_left_released(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.left_is_pressed = false;
        self.push(MouseEventKind::LeftRelease);
    }

    pub(crate) fn on_right_pressed(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.right_is_pressed = true;
        self.push(MouseEventKind::RightPress);
    }

    pub(crate) fn on_right_released(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.right_is_pressed = false;
        self.push(MouseEventKind::RightRelease);
    }

    pub(crate) fn on_wheel_up(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.push(MouseEventKind::WheelUp);
    }

    pub(crate) fn on_wheel_down(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.push(MouseEventKind::WheelDown);
    }
}

impl Default for Mouse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_snapshot_of_updated_state() {
        let mut mouse = Mouse::new();
        mouse.on_left_pressed(5, 6);
        mouse.on_mouse_move(7, 8);
        mouse.on_left_released(9, 10);

        let press = mouse.read();
        assert_eq!(press.kind, MouseEventKind::LeftPress);
        assert!(press.left_down);
        assert_eq!(press.position(), (5, 6));

        let drag = mouse.read();
        assert_eq!(drag.kind, MouseEventKind::Move);
        assert!(drag.left_down);
        assert_eq!(drag.position(), (7, 8));

        let release = mouse.read();
        assert_eq!(release.kind, MouseEventKind::LeftRelease);
        assert!(!release.left_down);
        assert!(!mouse.left_is_pressed());
        assert_eq!(mouse.position(), (9, 10));
    }

    #[test]
    fn test_read_on_empty_queue() {
        let mut mouse = Mouse::new();
        assert!(mouse.is_empty());
        assert!(!mouse.read().is_valid());
        assert_eq!(mouse.queued(), 0);
    }

    #[test]
    fn test_enter_and_leave_flip_flag() {
        let mut mouse = Mouse::new();
        mouse.on_mouse_enter();
        assert!(mouse.is_in_window());
        mouse.on_mouse_leave();
        assert!(!mouse.is_in_window());

        assert_eq!(mouse.read().kind, MouseEventKind::Enter);
        assert_eq!(mouse.read().kind, MouseEventKind::Leave);
    }

    #[test]
    fn test_right_button_and_wheel() {
        let mut mouse = Mouse::new();
        mouse.on_right_pressed(1, 1);
        mouse.on_wheel_up(2, 2);
        mouse.on_wheel_down(3, 3);
        mouse.on_right_released(4, 4);

        let kinds: Vec<_> = std::iter::from_fn(|| {
            let event = mouse.read();
            event.is_valid().then_some(event)
        })
        .collect();

        assert_eq!(kinds.len(), 4);
        assert_eq!(kinds[1].kind, MouseEventKind::WheelUp);
        assert!(kinds[1].right_down);
        assert_eq!(kinds[2].kind, MouseEventKind::WheelDown);
        assert_eq!(kinds[3].kind, MouseEventKind::RightRelease);
        assert!(!kinds[3].right_down);
    }

    #[test]
    fn test_queue_drops_oldest() {
        let mut mouse = Mouse::with_capacity(4);
        for i in 0..10 {
            mouse.on_mouse_move(i, i);
        }

        assert_eq!(mouse.queued(), 4);
        assert_eq!(mouse.read().position(), (6, 6));
        mouse.flush();
        assert!(mouse.is_empty());
    }
}
