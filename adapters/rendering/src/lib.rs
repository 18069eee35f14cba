#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contract between the world's event stream and a renderer.
//!
//! The core never draws: every visual change flows out of the world as a
//! `TileChanged` event, and hosts implement [`RenderSink`] to translate
//! those placements into their tilemap, terminal, or test double. This
//! crate owns that boundary so renderers never need to understand game
//! rules, only tile ids.

use tilegarden_core::Event;

/// Placement sink implemented by the host's renderer.
pub trait RenderSink {
    /// Places the tile with `render_id` at the given grid coordinates.
    fn place_tile(&mut self, render_id: u16, column: u32, row: u32);
}

/// A single tile placement extracted from the event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePatch {
    /// Tileset id to place.
    pub render_id: u16,
    /// Column receiving the tile.
    pub column: u32,
    /// Row receiving the tile.
    pub row: u32,
}

/// Extracts the tile placements from an event batch in emission order.
#[must_use]
pub fn tile_patches(events: &[Event]) -> Vec<TilePatch> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TileChanged { cell, render_id } => Some(TilePatch {
                render_id: *render_id,
                column: cell.column(),
                row: cell.row(),
            }),
            _ => None,
        })
        .collect()
}

/// Forwards every tile placement in the batch to the sink, in order.
pub fn present(events: &[Event], sink: &mut dyn RenderSink) {
    for patch in tile_patches(events) {
        sink.place_tile(patch.render_id, patch.column, patch.row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegarden_core::CellCoord;

    #[derive(Default)]
    struct RecordingSink {
        placed: Vec<TilePatch>,
    }

    impl RenderSink for RecordingSink {
        fn place_tile(&mut self, render_id: u16, column: u32, row: u32) {
            self.placed.push(TilePatch {
                render_id,
                column,
                row,
            });
        }
    }

    #[test]
    fn placements_are_forwarded_in_emission_order() {
        let events = vec![
            Event::TileChanged {
                cell: CellCoord::new(1, 2),
                render_id: 4,
            },
            Event::AutosaveDue,
            Event::TileChanged {
                cell: CellCoord::new(3, 3),
                render_id: 26,
            },
        ];
        let mut sink = RecordingSink::default();
        present(&events, &mut sink);
        assert_eq!(
            sink.placed,
            vec![
                TilePatch {
                    render_id: 4,
                    column: 1,
                    row: 2
                },
                TilePatch {
                    render_id: 26,
                    column: 3,
                    row: 3
                },
            ]
        );
    }

    #[test]
    fn batches_without_placements_draw_nothing() {
        let mut sink = RecordingSink::default();
        present(&[Event::GameWon], &mut sink);
        assert!(sink.placed.is_empty());
    }
}
