//! Approximate shortest connections between rooms
//!
//! Comparing every edge tile of one room with every edge tile of another is
//! quadratic per pair and dominates large maps. Instead both perimeters are
//! walked in order and the walk skips ahead by the distance just measured:
//! neighbouring edge tiles are at most one step apart, so a tile `d` positions
//! further along cannot be much closer than the current candidate. The result
//! is a short connection, not provably the shortest one.
//!
//! Parallelization: each worker fills a disjoint slice of a pre-sized result
//! vector, so the pair computation needs no locks.

use rayon::prelude::*;

use crate::caves::rooms::Room;
use crate::tilemap::Coord;

/// Any distance below this ends the search for a pair immediately; tunnel
/// carving dominates accuracy at that scale.
pub const EARLY_EXIT_DISTANCE: u32 = 3;

/// Pairs handled by one parallel work item.
const PAIRS_PER_TASK: usize = 64;

/// A candidate edge between two rooms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomConnection {
    /// Chebyshev distance between the witness tiles
    pub distance: u32,
    /// Witness tile in `room_a`
    pub tile_a: Coord,
    /// Witness tile in `room_b`
    pub tile_b: Coord,
    pub room_a: usize,
    pub room_b: usize,
}

/// Approximate the closest pair of edge tiles between two rooms.
pub fn find_connection(a: &Room, b: &Room, room_a: usize, room_b: usize) -> RoomConnection {
    let edges_a = perimeter(a);
    let edges_b = perimeter(b);

    let mut best = RoomConnection {
        distance: u32::MAX,
        tile_a: Coord::default(),
        tile_b: Coord::default(),
        room_a,
        room_b,
    };

    let mut i = 0;
    'search: while i < edges_a.len() {
        let tile_a = edges_a[i];
        let mut sweep_best = u32::MAX;

        let mut j = 0;
        while j < edges_b.len() {
            let tile_b = edges_b[j];
            let d = tile_a.chebyshev(tile_b);
            if d < best.distance {
                best.distance = d;
                best.tile_a = tile_a;
                best.tile_b = tile_b;
            }
            if d < EARLY_EXIT_DISTANCE {
                break 'search;
            }
            sweep_best = sweep_best.min(d);
            j += d.max(1) as usize;
        }

        i += sweep_best.max(1) as usize;
    }

    best
}

/// Edge tiles, or all tiles for a room that somehow has no recorded edge.
fn perimeter(room: &Room) -> &[Coord] {
    if room.edge_tiles().is_empty() {
        room.tiles()
    } else {
        room.edge_tiles()
    }
}

/// Every unordered room pair (i < j) in discovery order.
pub fn room_pairs(room_count: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(room_count * room_count.saturating_sub(1) / 2);
    for i in 0..room_count {
        for j in (i + 1)..room_count {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Compute one connection per unordered room pair, in `room_pairs` order.
pub fn compute_connections(rooms: &[Room]) -> Vec<RoomConnection> {
    let pairs = room_pairs(rooms.len());
    let mut connections = vec![RoomConnection::default(); pairs.len()];

    connections
        .par_chunks_mut(PAIRS_PER_TASK)
        .zip(pairs.par_chunks(PAIRS_PER_TASK))
        .for_each(|(slots, chunk)| {
            for (slot, &(i, j)) in slots.iter_mut().zip(chunk) {
                *slot = find_connection(&rooms[i], &rooms[j], i, j);
            }
        });

    connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caves::regions::scan_regions;
    use crate::caves::rooms::build_rooms;
    use crate::tilemap::{Tile, TileGrid};

    fn rooms_of(rows: &[&str]) -> Vec<Room> {
        let grid = TileGrid::from_rows(rows);
        build_rooms(scan_regions(&grid, Tile::Floor), &grid)
    }

    /// Exhaustive reference used to bound the approximation.
    fn exact_distance(a: &Room, b: &Room) -> u32 {
        a.edge_tiles()
            .iter()
            .flat_map(|ta| b.edge_tiles().iter().map(move |tb| ta.chebyshev(*tb)))
            .min()
            .unwrap()
    }

    #[test]
    fn test_witnesses_belong_to_rooms() {
        let rooms = rooms_of(&[
            "####################",
            "#...######...#######",
            "#...######...#######",
            "#...######...#######",
            "####################",
        ]);
        assert_eq!(rooms.len(), 2);
        let conn = find_connection(&rooms[0], &rooms[1], 0, 1);
        assert!(rooms[0].tiles().contains(&conn.tile_a));
        assert!(rooms[1].tiles().contains(&conn.tile_b));
        assert_eq!(conn.distance, conn.tile_a.chebyshev(conn.tile_b));
        assert_eq!((conn.room_a, conn.room_b), (0, 1));
    }

    #[test]
    fn test_aligned_rooms_overshoot_is_bounded() {
        let rooms = rooms_of(&[
            "####################",
            "#...######...#######",
            "#...######...#######",
            "#...######...#######",
            "####################",
        ]);
        let conn = find_connection(&rooms[0], &rooms[1], 0, 1);
        let exact = exact_distance(&rooms[0], &rooms[1]);
        assert_eq!(exact, 7);
        // Skipping along a 3x3 perimeter can miss by at most the room span.
        assert!(conn.distance >= exact && conn.distance <= exact + 2);
    }

    #[test]
    fn test_close_rooms_exit_early() {
        let rooms = rooms_of(&[
            "######",
            "#....#",
            "######",
            "#....#",
            "######",
        ]);
        let conn = find_connection(&rooms[0], &rooms[1], 0, 1);
        assert!(conn.distance < EARLY_EXIT_DISTANCE);
        assert_eq!(conn.distance, 2);
        assert_eq!(conn.tile_a, Coord::new(1, 1));
        assert_eq!(conn.tile_b, Coord::new(1, 3));
    }

    #[test]
    fn test_search_stops_at_first_close_tile() {
        // Room B's walk visits (3, 1) at distance 2 before (2, 2) at distance 1.
        let rooms = rooms_of(&[
            "#####",
            "#.#.#",
            "##..#",
            "#####",
        ]);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].edge_tiles()[0], Coord::new(3, 1));
        let conn = find_connection(&rooms[0], &rooms[1], 0, 1);
        assert_eq!(conn.distance, 2);
        assert_eq!(conn.tile_b, Coord::new(3, 1));
    }

    #[test]
    fn test_approximation_stays_close_to_exact() {
        let rooms = rooms_of(&[
            "##############################",
            "#.....########################",
            "#......#######################",
            "#.......##############.....###",
            "#......##############.......##",
            "#.....###############.......##",
            "######################.....###",
            "##############################",
        ]);
        assert_eq!(rooms.len(), 2);
        let conn = find_connection(&rooms[0], &rooms[1], 0, 1);
        let exact = exact_distance(&rooms[0], &rooms[1]);
        assert!(conn.distance >= exact);
        assert!(conn.distance <= exact * 2, "approx {} vs exact {}", conn.distance, exact);
    }

    #[test]
    fn test_room_pairs_enumeration_order() {
        assert_eq!(room_pairs(0), Vec::<(usize, usize)>::new());
        assert_eq!(room_pairs(1), Vec::<(usize, usize)>::new());
        assert_eq!(room_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rows = vec!["#".repeat(61)];
        for y in 1..40 {
            let row: String = (0..61)
                .map(|x| if x % 6 != 0 && y % 5 != 0 && x < 60 { '.' } else { '#' })
                .collect();
            rows.push(row);
        }
        rows.push("#".repeat(61));
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let rooms = rooms_of(&refs);
        assert!(rooms.len() > 20);

        let parallel = compute_connections(&rooms);
        let sequential: Vec<_> = room_pairs(rooms.len())
            .into_iter()
            .map(|(i, j)| find_connection(&rooms[i], &rooms[j], i, j))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
