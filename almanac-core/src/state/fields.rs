use core::ops::BitOr;

/// An on-screen field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Time,
    Date,
    Battery,
    Temperature,
    Conditions,
    Rate,
}

impl Field {
    /// All fields, in render order
    pub const ALL: [Field; 6] = [
        Field::Time,
        Field::Date,
        Field::Battery,
        Field::Temperature,
        Field::Conditions,
        Field::Rate,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of fields touched by a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSet(u8);

impl FieldSet {
    pub const ALL: Self = Self(0b11_1111);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn only(field: Field) -> Self {
        Self(field.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Fields in the set, in render order
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl BitOr for FieldSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<Field> for FieldSet {
    fn from(field: Field) -> Self {
        Self::only(field)
    }
}
