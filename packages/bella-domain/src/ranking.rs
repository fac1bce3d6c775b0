//! Wire enumerations for directory listing requests.

/// Sort mode code: `0` orders by aggregate rating, anything else by view
/// count, both descending with hospital id as the tie break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
	Rating,
	Views,
}

impl SortMode {
	pub fn from_code(code: i64) -> Self {
		if code == 0 { Self::Rating } else { Self::Views }
	}
}

/// Category filter code: `0` means no filter, a positive value names a
/// category tag id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
	All,
	Category(i64),
}

impl CategoryFilter {
	pub fn from_code(code: i64) -> Self {
		if code == 0 { Self::All } else { Self::Category(code) }
	}
}
