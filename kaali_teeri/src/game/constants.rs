//! Fixed rule constants.

/// Fewest players a round can be dealt for.
pub const MIN_PLAYERS: usize = 4;

/// Room capacity; also the largest table a round can be dealt for.
pub const MAX_PLAYERS: usize = 8;

/// Lowest legal bid.
pub const MIN_BID: u32 = 150;

/// Highest legal bid. Bidding this ends the auction on the spot.
pub const MAX_BID: u32 = 250;

/// Rounds played before the game ends.
pub const DEFAULT_ROUND_LIMIT: u32 = 10;

/// Default lifetime of an advisory pause marker.
pub const DEFAULT_PAUSE_SECS: i64 = 3 * 60;

/// Points carried by the three of spades.
pub const KAALI_TEERI_POINTS: u32 = 30;

/// Points carried by each ace, king, queen, jack and ten.
pub const HONOUR_POINTS: u32 = 10;

/// Points carried by each five.
pub const FIVE_POINTS: u32 = 5;
