use serde::Serialize;

/// One of the nine cells of a 3×3 split, addressed by column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    col: u8,
    row: u8,
}

impl GridCell {
    pub const CENTER: Self = Self { col: 1, row: 1 };

    pub const fn new(col: u8, row: u8) -> Option<Self> {
        if col < 3 && row < 3 {
            Some(Self { col, row })
        } else {
            None
        }
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn row(self) -> u8 {
        self.row
    }

    /// Unit direction pointing from the center cell towards this one.
    pub fn direction(self) -> (i32, i32) {
        (i32::from(self.col) - 1, i32::from(self.row) - 1)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..3).flat_map(|row| (0..3).map(move |col| Self { col, row }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    Drill(GridCell),
    Reset(GridCell),
    Back,
    ManualMove { dx: i32, dy: i32 },
    StopManualMove,
    MoveToNextMonitor,
    LeftClick,
    RightClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionId {
    Activate,
    Deactivate,
    Drill,
    Reset,
    Back,
    ManualMove,
    StopManualMove,
    MoveToNextMonitor,
    LeftClick,
    RightClick,
    MotionTick,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Drill => "drill",
            Self::Reset => "reset",
            Self::Back => "back",
            Self::ManualMove => "manual-move",
            Self::StopManualMove => "stop-manual-move",
            Self::MoveToNextMonitor => "move-to-next-monitor",
            Self::LeftClick => "left-click",
            Self::RightClick => "right-click",
            Self::MotionTick => "motion-tick",
        }
    }
}

impl GridCommand {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::Drill(_) => ActionId::Drill,
            Self::Reset(_) => ActionId::Reset,
            Self::Back => ActionId::Back,
            Self::ManualMove { .. } => ActionId::ManualMove,
            Self::StopManualMove => ActionId::StopManualMove,
            Self::MoveToNextMonitor => ActionId::MoveToNextMonitor,
            Self::LeftClick => ActionId::LeftClick,
            Self::RightClick => ActionId::RightClick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandOutcome {
    Applied,
    Noop,
}

impl CommandOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Noop => "noop",
        }
    }
}
