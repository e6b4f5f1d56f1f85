//! Document permission flags (the /P entry).

use std::ops::{BitOr, BitOrAssign};

/// User access permissions granted by an encrypted document.
///
/// Bits follow the PDF numbering (bit 3 = 0x4 is print). The reserved bits
/// in [`Permissions::PADDING_BITS`] are always added when the value is
/// hashed or written.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Self = Self(0);
    pub const PRINT: Self = Self(0x0000_0004);
    pub const EDIT: Self = Self(0x0000_0008);
    pub const COPY: Self = Self(0x0000_0010);
    pub const EDIT_ANNOTATIONS: Self = Self(0x0000_0020);
    /// Revision 3+: fill in form fields.
    pub const FILL_FORM: Self = Self(0x0000_0100);
    /// Revision 3+: extract for accessibility.
    pub const EXTRACT_ACCESS: Self = Self(0x0000_0200);
    /// Revision 3+: insert, rotate and delete pages.
    pub const ASSEMBLE: Self = Self(0x0000_0400);
    /// Revision 3+: print at full quality.
    pub const PRINT_HIGH_QUALITY: Self = Self(0x0000_0800);
    pub const ALL: Self = Self(0x0000_0F3C);

    /// Reserved bits that must be set in /P.
    pub const PADDING_BITS: u32 = 0xFFFF_F0C0;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The /P value as hashed into the encryption key.
    pub const fn value(self) -> u32 {
        self.0 | Self::PADDING_BITS
    }

    /// The /P value as written into the encryption dictionary.
    pub const fn signed_value(self) -> i32 {
        self.value() as i32
    }

    /// Look up a single permission by its command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::PRINT),
            "edit" => Some(Self::EDIT),
            "copy" => Some(Self::COPY),
            "annotate" => Some(Self::EDIT_ANNOTATIONS),
            "fill-form" => Some(Self::FILL_FORM),
            "accessibility" => Some(Self::EXTRACT_ACCESS),
            "assemble" => Some(Self::ASSEMBLE),
            "print-high" => Some(Self::PRINT_HIGH_QUALITY),
            "all" => Some(Self::ALL),
            "none" => Some(Self::NONE),
            _ => None,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Permissions({:#06x})", self.0)
    }
}
