//! Floor grid, items lying on it, and what the player can currently see.

mod carve;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg, field_of_view};
use bracket_terminal::prelude::RGB;
use smallvec::SmallVec;

use crate::data::items::{Item, ItemFamily};

pub use carve::{Carver, OpenArena, RoomsAndCorridors};

/// What occupies a cell, as far as movement and spawning care.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Floor,
    Wall,
    Exit,
    Item(ItemFamily),
}

/// Grid queries and item bookkeeping used by the turn rules.
pub trait Grid {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width() && point.y >= 0 && point.y < self.height()
    }

    /// Open to walking hostiles. The exit is not; the player may still enter it.
    fn is_walkable(&self, point: Point) -> bool;
    fn is_exit(&self, point: Point) -> bool;
    fn cell_at(&self, point: Point) -> Cell;

    fn items(&self) -> &[Item];
    fn place_item(&mut self, item: Item);
    fn remove_item(&mut self, index: usize) -> Option<Item>;

    fn item_at(&self, point: Point) -> Option<(usize, Item)> {
        self.items()
            .iter()
            .enumerate()
            .find(|(_, item)| item.pos == point)
            .map(|(idx, item)| (idx, *item))
    }

    fn spawn_point(&self) -> Point;
    fn exit(&self) -> Point;
}

/// Fog of war.
pub trait Visibility {
    fn is_visible(&self, point: Point) -> bool;
    fn is_revealed(&self, point: Point) -> bool;
    /// Replace the visible set with the view from `origin`.
    fn compute(&mut self, origin: Point, radius: i32);
    /// Add the view from `origin` to the visible set.
    fn light(&mut self, origin: Point, radius: i32);
    fn reveal_all(&mut self);
}

pub trait Terrain: Grid + Visibility {}

impl<T: Grid + Visibility> Terrain for T {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Floor,
    Exit,
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub glyph: u16,
    pub fg: RGB,
    pub blocks_move: bool,
    pub blocks_sight: bool,
    pub revealed: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            glyph: b'#' as u16,
            fg: RGB::from_u8(110, 110, 120),
            blocks_move: true,
            blocks_sight: true,
            revealed: false,
        }
    }

    pub fn floor() -> Self {
        Self {
            kind: TileKind::Floor,
            glyph: b'.' as u16,
            fg: RGB::from_u8(60, 60, 70),
            blocks_move: false,
            blocks_sight: false,
            revealed: false,
        }
    }

    /// Drawn like a wall until the hint is shown. Anything may stand on it;
    /// only the player's own step onto it ends the floor.
    pub fn exit() -> Self {
        Self {
            kind: TileKind::Exit,
            glyph: b'#' as u16,
            fg: RGB::from_u8(110, 110, 120),
            blocks_move: false,
            blocks_sight: false,
            revealed: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Floor {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
    items: Vec<Item>,
    visible: Vec<bool>,
    spawn: Point,
    exit: Point,
}

impl Floor {
    /// Solid rock, waiting for a carver.
    pub fn solid(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); size],
            items: Vec::new(),
            visible: vec![false; size],
            spawn: Point::new(width / 2, height / 2),
            exit: Point::new(width / 2, height / 2),
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if Grid::in_bounds(self, point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn set_tile(&mut self, point: Point, tile: Tile) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx] = tile;
        }
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point).map(|idx| &self.tiles[idx])
    }

    pub fn paint_floor(&mut self, point: Point) {
        self.set_tile(point, Tile::floor());
    }

    /// Seal the outer ring so nothing walks off the grid.
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            self.set_tile(Point::new(x, 0), Tile::wall());
            self.set_tile(Point::new(x, self.height - 1), Tile::wall());
        }
        for y in 0..self.height {
            self.set_tile(Point::new(0, y), Tile::wall());
            self.set_tile(Point::new(self.width - 1, y), Tile::wall());
        }
    }

    pub fn set_spawn(&mut self, point: Point) {
        self.spawn = point;
    }

    pub fn set_exit(&mut self, point: Point) {
        self.set_tile(point, Tile::exit());
        self.exit = point;
    }

    fn mark_visible(&mut self, points: Vec<Point>) {
        for point in points {
            if let Some(idx) = self.idx(point) {
                self.visible[idx] = true;
                self.tiles[idx].revealed = true;
            }
        }
    }
}

impl Grid for Floor {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| !tile.blocks_move)
    }

    fn is_exit(&self, point: Point) -> bool {
        self.tile_at(point)
            .is_some_and(|tile| tile.kind == TileKind::Exit)
    }

    fn cell_at(&self, point: Point) -> Cell {
        match self.tile_at(point).map(|tile| tile.kind) {
            None | Some(TileKind::Wall) => Cell::Wall,
            Some(TileKind::Exit) => Cell::Exit,
            Some(TileKind::Floor) => match self.item_at(point) {
                Some((_, item)) => Cell::Item(item.kind.family()),
                None => Cell::Floor,
            },
        }
    }

    fn items(&self) -> &[Item] {
        &self.items
    }

    fn place_item(&mut self, item: Item) {
        self.items.push(item);
    }

    fn remove_item(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    fn spawn_point(&self) -> Point {
        self.spawn
    }

    fn exit(&self) -> Point {
        self.exit
    }
}

impl Visibility for Floor {
    fn is_visible(&self, point: Point) -> bool {
        self.idx(point).is_some_and(|idx| self.visible[idx])
    }

    fn is_revealed(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| tile.revealed)
    }

    fn compute(&mut self, origin: Point, radius: i32) {
        self.visible.iter_mut().for_each(|seen| *seen = false);
        self.light(origin, radius);
    }

    fn light(&mut self, origin: Point, radius: i32) {
        let view = field_of_view(origin, radius, &*self);
        self.mark_visible(view);
    }

    fn reveal_all(&mut self) {
        self.visible.iter_mut().for_each(|seen| *seen = true);
        self.tiles.iter_mut().for_each(|tile| tile.revealed = true);
    }
}

impl BaseMap for Floor {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| tile.blocks_sight)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dir in [
            Point::new(1, 0),
            Point::new(-1, 0),
            Point::new(0, 1),
            Point::new(0, -1),
        ] {
            let dest = point + dir;
            if self.is_walkable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for Floor {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        Grid::in_bounds(self, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::ItemKind;

    fn arena() -> Floor {
        let mut floor = Floor::solid(10, 8);
        for y in 1..7 {
            for x in 1..9 {
                floor.paint_floor(Point::new(x, y));
            }
        }
        floor.set_exit(Point::new(8, 6));
        floor
    }

    #[test]
    fn exit_is_walkable_and_reported() {
        let floor = arena();
        let exit = Point::new(8, 6);
        assert!(floor.is_walkable(exit));
        assert!(floor.is_exit(exit));
        assert_eq!(floor.cell_at(exit), Cell::Exit);
        assert_eq!(floor.exit(), exit);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let floor = arena();
        assert_eq!(floor.cell_at(Point::new(-1, 3)), Cell::Wall);
        assert!(!floor.is_walkable(Point::new(10, 3)));
    }

    #[test]
    fn items_show_up_in_cells_and_can_be_removed() {
        let mut floor = arena();
        let spot = Point::new(2, 2);
        floor.place_item(Item::new(spot, ItemKind::Shield));
        assert_eq!(floor.cell_at(spot), Cell::Item(ItemFamily::Shield));
        let (idx, item) = floor.item_at(spot).unwrap();
        assert_eq!(item.kind, ItemKind::Shield);
        assert!(floor.remove_item(idx).is_some());
        assert_eq!(floor.cell_at(spot), Cell::Floor);
        assert!(floor.remove_item(5).is_none());
    }

    #[test]
    fn compute_replaces_and_light_adds() {
        let mut floor = arena();
        floor.compute(Point::new(2, 2), 1);
        assert!(floor.is_visible(Point::new(2, 2)));
        assert!(!floor.is_visible(Point::new(7, 5)));

        floor.light(Point::new(7, 5), 1);
        assert!(floor.is_visible(Point::new(2, 2)));
        assert!(floor.is_visible(Point::new(7, 5)));

        floor.compute(Point::new(7, 5), 1);
        assert!(!floor.is_visible(Point::new(2, 2)));
        assert!(floor.is_revealed(Point::new(2, 2)));
    }

    #[test]
    fn reveal_all_lights_everything() {
        let mut floor = arena();
        floor.reveal_all();
        assert!(floor.is_visible(Point::new(0, 0)));
        assert!(floor.is_revealed(Point::new(9, 7)));
    }
}
