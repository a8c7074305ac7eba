use std::fmt;
use std::str::FromStr;

/// ELI5:
/// ┌──────────────── Key Edge → Signal ──────────────────────┐
/// │  keydown ArrowLeft   →  PRESS left                      │
/// │  keyup   ArrowLeft   →  RELEASE left                    │
/// │  keydown KeyQ        →  (ignored, slot unchanged)       │
/// └─────────────────────────────────────────────────────────┘
/// The state machine never sees held keys, only the most recent edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// KeyboardEvent.key -> Direction, None for anything we don't bind
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum InputSignal {
    #[default]
    None,
    Press(Direction),
    Release(Direction),
}

impl InputSignal {
    pub fn is_press(self, direction: Direction) -> bool {
        self == InputSignal::Press(direction)
    }

    /// Text form used by the overlay and the JS facing `Simulation`.
    /// Anything outside the vocabulary is `None`, never an error.
    pub fn parse(text: &str) -> Self {
        text.parse().unwrap_or_default()
    }
}

impl FromStr for InputSignal {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut words = text.split_whitespace();
        let signal = match (words.next(), words.next(), words.next()) {
            (Some(edge), Some(direction), None) => {
                let direction = match direction {
                    "left" => Some(Direction::Left),
                    "right" => Some(Direction::Right),
                    "up" => Some(Direction::Up),
                    "down" => Some(Direction::Down),
                    _ => None,
                };
                match (edge, direction) {
                    ("PRESS", Some(d)) => InputSignal::Press(d),
                    ("RELEASE", Some(d)) => InputSignal::Release(d),
                    _ => InputSignal::None,
                }
            }
            _ => InputSignal::None,
        };
        Ok(signal)
    }
}

impl fmt::Display for InputSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSignal::None => write!(f, "none"),
            InputSignal::Press(d) => write!(f, "PRESS {}", d.as_str()),
            InputSignal::Release(d) => write!(f, "RELEASE {}", d.as_str()),
        }
    }
}

/// Single slot, last event wins. Reading does not clear it: the signal
/// stays current until the next key edge arrives.
#[derive(Debug, Default, Copy, Clone)]
pub struct LastSignal {
    current: InputSignal,
}

impl LastSignal {
    pub fn press(&mut self, key: &str) {
        if let Some(direction) = Direction::from_key(key) {
            self.current = InputSignal::Press(direction);
        }
    }

    pub fn release(&mut self, key: &str) {
        if let Some(direction) = Direction::from_key(key) {
            self.current = InputSignal::Release(direction);
        }
    }

    pub fn current(&self) -> InputSignal {
        self.current
    }
}
