/// Raw OS virtual-key code, using the Windows virtual-key numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const ENTER: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const ALT: Self = Self(0x12);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const LEFT_SUPER: Self = Self(0x5B);
    pub const RIGHT_SUPER: Self = Self(0x5C);
    pub const NUMPAD0: Self = Self(0x60);
    pub const LEFT_SHIFT: Self = Self(0xA0);
    pub const RIGHT_SHIFT: Self = Self(0xA1);
    pub const LEFT_CONTROL: Self = Self(0xA2);
    pub const RIGHT_CONTROL: Self = Self(0xA3);
    pub const LEFT_ALT: Self = Self(0xA4);
    pub const RIGHT_ALT: Self = Self(0xA5);

    pub const fn from_ascii(byte: u8) -> Self {
        Self(byte as u16)
    }

    /// Letter keys share their uppercase ASCII code.
    pub fn letter(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        upper
            .is_ascii_uppercase()
            .then(|| Self(u16::from(upper as u8)))
    }

    /// Digit row keys share their ASCII code.
    pub fn digit(ch: char) -> Option<Self> {
        ch.is_ascii_digit().then(|| Self(u16::from(ch as u8)))
    }

    pub fn numpad(digit: u8) -> Option<Self> {
        (digit < 10).then(|| Self(Self::NUMPAD0.0 + u16::from(digit)))
    }

    pub fn is_shift(self) -> bool {
        matches!(self, Self::SHIFT | Self::LEFT_SHIFT | Self::RIGHT_SHIFT)
    }

    pub fn is_modifier(self) -> bool {
        self.is_shift()
            || matches!(
                self,
                Self::CONTROL
                    | Self::LEFT_CONTROL
                    | Self::RIGHT_CONTROL
                    | Self::ALT
                    | Self::LEFT_ALT
                    | Self::RIGHT_ALT
                    | Self::LEFT_SUPER
                    | Self::RIGHT_SUPER
            )
    }
}
