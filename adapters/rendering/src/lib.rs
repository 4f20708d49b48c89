#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering for expedition grid snapshots.
//!
//! The collaborator renders each turn as a one-line notice banner above the
//! grid: rows are space-joined tile symbols, newline-separated, with the
//! start tile on the bottom row. The symbol assigned to each semantic tile
//! category is owned by a [`GlyphSet`]; the only contract is that every
//! category maps to one distinct, stable symbol per render call.

use anyhow::{bail, Result as AnyResult};
use expedition_core::TileKind;
use expedition_world::query::GridSnapshot;

/// Maps each semantic tile category to the symbol shown in chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    ground: String,
    player: String,
    exit: String,
    event: String,
    boss: String,
    barrier: String,
}

impl GlyphSet {
    /// Plain ASCII symbols suitable for terminals and logs.
    #[must_use]
    pub fn ascii() -> Self {
        Self {
            ground: ".".to_owned(),
            player: "@".to_owned(),
            exit: "O".to_owned(),
            event: "$".to_owned(),
            boss: "B".to_owned(),
            barrier: "#".to_owned(),
        }
    }

    /// Emoji symbols mirroring the original chat-bot rendering.
    #[must_use]
    pub fn emoji() -> Self {
        Self {
            ground: "\u{1f334}".to_owned(),   // palm tree
            player: "\u{1f9cd}".to_owned(),   // standing person
            exit: "\u{1f573}\u{fe0f}".to_owned(), // hole
            event: "\u{1fa99}".to_owned(),    // coin
            boss: "\u{1f42d}".to_owned(),     // mouse face
            barrier: "\u{26f0}\u{fe0f}".to_owned(), // mountain
        }
    }

    /// Builds a glyph set from caller-provided symbols.
    ///
    /// Fails when a symbol is empty or two categories share a symbol, since
    /// the renderer could no longer distinguish them.
    pub fn custom(
        ground: &str,
        player: &str,
        exit: &str,
        event: &str,
        boss: &str,
        barrier: &str,
    ) -> AnyResult<Self> {
        let symbols = [ground, player, exit, event, boss, barrier];
        for (index, symbol) in symbols.iter().enumerate() {
            if symbol.is_empty() {
                bail!("tile symbols must not be empty");
            }
            if symbols[index + 1..].contains(symbol) {
                bail!("tile symbol '{symbol}' is assigned to more than one category");
            }
        }

        Ok(Self {
            ground: ground.to_owned(),
            player: player.to_owned(),
            exit: exit.to_owned(),
            event: event.to_owned(),
            boss: boss.to_owned(),
            barrier: barrier.to_owned(),
        })
    }

    /// Symbol assigned to the provided tile category.
    #[must_use]
    pub fn symbol(&self, kind: TileKind) -> &str {
        match kind {
            TileKind::Ground => &self.ground,
            TileKind::Player => &self.player,
            TileKind::Exit => &self.exit,
            TileKind::Event => &self.event,
            TileKind::Boss => &self.boss,
            TileKind::Barrier => &self.barrier,
        }
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::ascii()
    }
}

/// Renders the snapshot as space-joined symbol rows, one line per row.
#[must_use]
pub fn render_grid(snapshot: &GridSnapshot, glyphs: &GlyphSet) -> String {
    let mut text = String::new();
    for row in snapshot.rows() {
        let line: Vec<&str> = row.iter().map(|kind| glyphs.symbol(*kind)).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

/// Formats the one-shot notice as the quoted banner line shown above the grid.
///
/// Returns `None` when the notice is empty so callers skip the banner rather
/// than render a blank quote line.
#[must_use]
pub fn notice_banner(notice: &str) -> Option<String> {
    if notice.is_empty() {
        None
    } else {
        Some(format!("> **{notice}**"))
    }
}

/// Composes the full turn output: banner (when present) above the grid.
#[must_use]
pub fn render_turn(notice: &str, snapshot: &GridSnapshot, glyphs: &GlyphSet) -> String {
    let grid = render_grid(snapshot, glyphs);
    match notice_banner(notice) {
        Some(banner) => format!("{banner}\n{grid}"),
        None => grid,
    }
}

#[cfg(test)]
mod tests {
    use expedition_core::{ExpeditionConfig, TileKind};
    use expedition_world::{query, Expedition};

    use super::{notice_banner, render_grid, render_turn, GlyphSet};

    fn snapshot() -> query::GridSnapshot {
        let expedition =
            Expedition::new(ExpeditionConfig::new(4, 3, 0, 1, 5)).expect("valid config");
        query::snapshot(&expedition)
    }

    #[test]
    fn grid_rows_are_space_joined_and_newline_separated() {
        let rendered = render_grid(&snapshot(), &GlyphSet::ascii());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        // Exit row: boss covers the exit, barrier sits left of nothing here.
        assert_eq!(lines[0], ". . . B");
        assert_eq!(lines[1], ". . # #");
        assert_eq!(lines[2], "@ . . .");
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn banner_quotes_the_notice_and_skips_empty_ones() {
        assert_eq!(
            notice_banner("You've moved up."),
            Some("> **You've moved up.**".to_owned())
        );
        assert_eq!(notice_banner(""), None);
    }

    #[test]
    fn turn_output_places_the_banner_above_the_grid() {
        let rendered = render_turn("You've moved up.", &snapshot(), &GlyphSet::ascii());
        assert!(rendered.starts_with("> **You've moved up.**\n"));
        assert!(rendered.ends_with("@ . . .\n"));
    }

    #[test]
    fn custom_glyphs_must_be_distinct_and_non_empty() {
        assert!(GlyphSet::custom(".", "@", "O", "$", "B", "#").is_ok());
        assert!(GlyphSet::custom(".", ".", "O", "$", "B", "#").is_err());
        assert!(GlyphSet::custom("", "@", "O", "$", "B", "#").is_err());
    }

    #[test]
    fn every_category_has_a_distinct_default_symbol() {
        for glyphs in [GlyphSet::ascii(), GlyphSet::emoji()] {
            let kinds = [
                TileKind::Ground,
                TileKind::Player,
                TileKind::Exit,
                TileKind::Event,
                TileKind::Boss,
                TileKind::Barrier,
            ];
            for (index, kind) in kinds.iter().enumerate() {
                for other in &kinds[index + 1..] {
                    assert_ne!(glyphs.symbol(*kind), glyphs.symbol(*other));
                }
            }
        }
    }
}
