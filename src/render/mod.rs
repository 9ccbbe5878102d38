use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use strum::IntoEnumIterator;

use gloomcrawl::data::PERK_BUNDLES;
use gloomcrawl::data::items::ItemFamily;
use gloomcrawl::data::monsters::{Species, fleeing_color};
use gloomcrawl::map::{Floor, Grid, Visibility};
use gloomcrawl::world::{Phase, Snapshot};

pub const PLAYER_GLYPH: char = '@';
const FIREFLY_GLYPH: char = '*';
const EXIT_GLYPH: char = '>';

pub struct Hud;

impl Hud {
    pub fn draw(&self, ctx: &mut BTerm, snap: &Snapshot) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width - 1, 4, RGB::named(GRAY), RGB::named(BLACK));

        let health = match snap.player.health {
            Some(health) => format!("HP {health}/{}", snap.player.max_health),
            None => format!("HP ??/{}", snap.player.max_health),
        };
        let ratio = snap.player.health.unwrap_or(snap.player.max_health) as f32
            / snap.player.max_health.max(1) as f32;
        let hp_color = if snap.player.health.is_none() {
            RGB::named(GRAY)
        } else if ratio <= 0.3 {
            RGB::named(ORANGE)
        } else {
            RGB::named(LIGHT_GREEN)
        };
        ctx.print_color(2, 1, hp_color, RGB::named(BLACK), &health);
        ctx.print_color(
            16,
            1,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!(
                "Floor {} | Shield {}+{} | Torch {}",
                snap.floor, snap.shield.fresh, snap.shield.spent, snap.torch_radius
            ),
        );

        let mut effects = Vec::new();
        if snap.poison > 0 {
            effects.push(format!("Poison {}", snap.poison));
        }
        if snap.curse > 0 {
            effects.push(format!("Cursed {}", snap.curse));
        }
        if snap.inversion > 0 {
            effects.push(format!("Inverted {} (X to shake)", snap.inversion));
        }
        ctx.print_color(
            2,
            2,
            RGB::from_u8(200, 90, 220),
            RGB::named(BLACK),
            effects.join(" | "),
        );

        if let Some(goal) = snap.quest.first() {
            ctx.print_color(
                2,
                3,
                RGB::from_u8(255, 215, 0),
                RGB::named(BLACK),
                format!("Quest: {}/{}", goal.progress, goal.target),
            );
        }
    }
}

pub fn draw_map(ctx: &mut BTerm, floor: &Floor, snap: &Snapshot, origin: Point) {
    for y in 0..floor.height {
        for x in 0..floor.width {
            let point = Point::new(x, y);
            let Some(tile) = floor.tile_at(point) else {
                continue;
            };
            let (sx, sy) = (origin.x + x, origin.y + y);
            if floor.is_visible(point) {
                ctx.set(sx, sy, tile.fg, RGB::named(BLACK), tile.glyph);
            } else if tile.revealed {
                ctx.set(sx, sy, RGB::named(DARK_GRAY), RGB::named(BLACK), tile.glyph);
            }
        }
    }

    if snap.show_exit {
        let (x, y) = snap.exit;
        ctx.set(
            origin.x + x,
            origin.y + y,
            RGB::named(YELLOW),
            RGB::named(BLACK),
            to_cp437(EXIT_GLYPH),
        );
    }

    for item in floor.items() {
        if floor.is_visible(item.pos) {
            let family = item.kind.family();
            ctx.set(
                origin.x + item.pos.x,
                origin.y + item.pos.y,
                family.color(),
                RGB::named(BLACK),
                to_cp437(family.glyph()),
            );
        }
    }

    for &(x, y) in &snap.fireflies {
        ctx.set(
            origin.x + x,
            origin.y + y,
            RGB::named(YELLOW),
            RGB::named(BLACK),
            to_cp437(FIREFLY_GLYPH),
        );
    }

    for hostile in &snap.hostiles {
        let point = Point::new(hostile.x, hostile.y);
        if hostile.attached || !floor.is_visible(point) {
            continue;
        }
        let template = hostile.species.template();
        let color = if hostile.fleeing {
            fleeing_color()
        } else {
            template.color
        };
        ctx.set(
            origin.x + hostile.x,
            origin.y + hostile.y,
            color,
            RGB::named(BLACK),
            to_cp437(template.glyph),
        );
    }

    ctx.set(
        origin.x + snap.player.x,
        origin.y + snap.player.y,
        RGB::named(WHITE),
        RGB::named(BLACK),
        to_cp437(PLAYER_GLYPH),
    );
}

/// Glyphs met so far, with kill and pickup counts.
pub fn draw_legend(ctx: &mut BTerm, snap: &Snapshot, x: i32, top: i32) {
    let mut row = top;
    for species in Species::iter() {
        if !snap.tally.seen_species[species.index()] {
            continue;
        }
        let template = species.template();
        ctx.set(x, row, template.color, RGB::named(BLACK), to_cp437(template.glyph));
        ctx.print(
            x + 2,
            row,
            format!("{species} x{}", snap.tally.kills[species.index()]),
        );
        row += 1;
    }
    for family in ItemFamily::iter() {
        if !snap.tally.seen_items[family.index()] {
            continue;
        }
        ctx.set(x, row, family.color(), RGB::named(BLACK), to_cp437(family.glyph()));
        ctx.print(
            x + 2,
            row,
            format!("{family} x{}", snap.tally.pickups[family.index()]),
        );
        row += 1;
    }
}

/// Name whatever visible thing sits under the mouse, next to the cursor.
pub fn draw_hover(ctx: &mut BTerm, floor: &Floor, snap: &Snapshot, origin: Point) {
    let (mx, my) = ctx.mouse_pos();
    let point = Point::new(mx - origin.x, my - origin.y);
    if !Grid::in_bounds(floor, point) || !floor.is_visible(point) {
        return;
    }

    let hostile = snap
        .hostiles
        .iter()
        .find(|hostile| !hostile.attached && hostile.x == point.x && hostile.y == point.y);
    let (label, color) = if let Some(hostile) = hostile {
        (
            format!("{} {}/{}", hostile.species, hostile.health, hostile.max_health),
            hostile.species.template().color,
        )
    } else if let Some((_, item)) = floor.item_at(point) {
        let family = item.kind.family();
        (family.to_string(), family.color())
    } else if floor.is_exit(point) {
        ("Stair".to_string(), RGB::from_u8(200, 200, 200))
    } else {
        return;
    };

    let (width, _) = ctx.get_char_size();
    let x = (mx + 1).min(width as i32 - label.len() as i32).max(0);
    ctx.print_color(x, my, color, RGB::named(BLACK), label);
}

pub fn draw_overlay(ctx: &mut BTerm, snap: &Snapshot) {
    match snap.phase {
        Phase::ChoicePending => {
            ctx.draw_box(10, 10, 58, 8, RGB::named(YELLOW), RGB::named(BLACK));
            ctx.print_color(
                12,
                11,
                RGB::named(YELLOW),
                RGB::named(BLACK),
                "Choose what follows you down:",
            );
            for (row, bundle) in PERK_BUNDLES.iter().enumerate() {
                ctx.print(
                    12,
                    13 + row as i32 * 2,
                    format!("[{}] {}: {}", bundle.key, bundle.title, bundle.labels.join(", ")),
                );
            }
        }
        Phase::Defeated => {
            let height = 6 + snap.collected.len() as i32;
            ctx.draw_box(16, 10, 46, height, RGB::named(RED), RGB::named(BLACK));
            ctx.print_color_centered(11, RGB::named(RED), RGB::named(BLACK), "You have fallen.");
            let pickups: u32 = snap.tally.pickups.iter().sum();
            let kills: u32 = snap.tally.kills.iter().sum();
            ctx.print_centered(
                13,
                format!("Floor {} | {kills} kills | {pickups} pickups", snap.floor),
            );
            for (row, label) in snap.collected.iter().enumerate() {
                ctx.print_color(
                    19,
                    14 + row as i32,
                    RGB::named(LIGHT_CYAN),
                    RGB::named(BLACK),
                    label,
                );
            }
            ctx.print_centered(9 + height, "F to try again, Esc to leave");
        }
        Phase::Exploring | Phase::Quit => {}
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        top + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Event Log",
    );
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}
