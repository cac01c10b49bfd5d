//! Shared UI icons.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");

// Column headers
pub static TODO: Emoji<'_, '_> = Emoji("📋 ", "");
pub static DOING: Emoji<'_, '_> = Emoji("🚧 ", "");
pub static DONE: Emoji<'_, '_> = Emoji("🏁 ", "");
