//! House layout on a cell grid, and seeding of the matching static bodies.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LevelError;
use crate::physics::body_set::BodyHandle;
use crate::physics::factory::BodyFactory;
use crate::physics::PhysicsWorld;

/// A named rectangular area of the house, in cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub floor: u8,
}

impl Room {
    /// Half-open containment test on cell coordinates.
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.x && cell.x < self.x + self.w && cell.y >= self.y && cell.y < self.y + self.h
    }
}

/// What sits in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Door {
        #[serde(default)]
        locked: bool,
        leads_to: String,
    },
    Stairs {
        leads_to: String,
    },
    Trap {
        #[serde(default)]
        active: bool,
    },
    Closet,
    Sofa,
    Table,
    Fireplace,
    Refrigerator,
    Car,
    Workbench,
    Bed,
    Crib,
    Toybox,
}

impl ObjectKind {
    /// Objects a runner can hide in, under or behind.
    pub fn is_hideable(&self) -> bool {
        matches!(
            self,
            ObjectKind::Closet
                | ObjectKind::Sofa
                | ObjectKind::Refrigerator
                | ObjectKind::Car
                | ObjectKind::Bed
                | ObjectKind::Toybox
        )
    }

    /// Objects that can be walked over.
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            ObjectKind::Door { .. } | ObjectKind::Stairs { .. } | ObjectKind::Trap { .. }
        )
    }
}

/// An object placed on one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    pub room: String,
    pub x: i32,
    pub y: i32,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

/// A cell runners escape through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub x: i32,
    pub y: i32,
    pub room: String,
    #[serde(default)]
    pub requires_key: bool,
}

/// Pickup types scattered around the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Opens exits that require a key.
    Key,
    Flashlight,
    Medkit,
    Trap,
}

/// An item lying on one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelItem {
    pub x: i32,
    pub y: i32,
    pub kind: ItemKind,
}

/// Grid-based level description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// World units per cell.
    pub cell_size: f32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
    pub rooms: Vec<Room>,
    pub objects: Vec<LevelObject>,
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub items: Vec<LevelItem>,
}

/// Hiding spot seeded from a hideable level object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotBody {
    /// Index into [`Level::objects`].
    pub object: usize,
    pub body: BodyHandle,
    pub center: Vec2,
}

/// Exit cell center in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPoint {
    pub position: Vec2,
    pub requires_key: bool,
}

/// Item placed at a world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPoint {
    pub kind: ItemKind,
    pub position: Vec2,
}

/// Handles of everything [`Level::populate`] added to the world, plus the
/// exit and item positions that have no body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelBodies {
    pub walls: Vec<BodyHandle>,
    pub furniture: Vec<BodyHandle>,
    pub hiding_spots: Vec<SpotBody>,
    pub exits: Vec<ExitPoint>,
    pub items: Vec<ItemPoint>,
}

impl Level {
    /// Parse a level from JSON.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        if !(level.cell_size.is_finite() && level.cell_size > 0.0) {
            return Err(LevelError::InvalidCellSize(level.cell_size));
        }
        Ok(level)
    }

    /// World position of a cell's top-left corner.
    #[inline]
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.cell_size
    }

    /// Cell containing a world position.
    #[inline]
    pub fn world_to_grid(&self, position: Vec2) -> IVec2 {
        (position / self.cell_size).floor().as_ivec2()
    }

    /// World position of a cell's center.
    #[inline]
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.grid_to_world(cell) + Vec2::splat(self.cell_size * 0.5)
    }

    /// Size of the whole map in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    /// First room containing the cell.
    pub fn room_at(&self, cell: IVec2) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(cell))
    }

    pub fn objects_in_room<'a>(&'a self, room_id: &'a str) -> impl Iterator<Item = &'a LevelObject> {
        self.objects.iter().filter(move |o| o.room == room_id)
    }

    /// Add boundary walls, furniture and hiding spots to `world`.
    ///
    /// Walls are one cell thick and sit just outside the map. Every solid
    /// object occupies one cell; hideable objects become hiding spots
    /// instead of plain furniture.
    pub fn populate(&self, world: &mut PhysicsWorld) -> Result<LevelBodies, LevelError> {
        let cell = self.cell_size;
        let size = self.world_size();
        let mut out = LevelBodies::default();

        let walls = [
            (-cell, -cell, size.x + 2.0 * cell, cell),
            (-cell, size.y, size.x + 2.0 * cell, cell),
            (-cell, 0.0, cell, size.y),
            (size.x, 0.0, cell, size.y),
        ];
        for (x, y, w, h) in walls {
            out.walls.push(world.add_body(BodyFactory::wall(x, y, w, h)?));
        }

        for (index, object) in self.objects.iter().enumerate() {
            if object.kind.is_passable() {
                continue;
            }
            let grid = IVec2::new(object.x, object.y);
            let corner = self.grid_to_world(grid);
            if object.kind.is_hideable() {
                let body = world.add_body(BodyFactory::hiding_spot(corner.x, corner.y, cell, cell)?);
                out.hiding_spots.push(SpotBody {
                    object: index,
                    body,
                    center: self.cell_center(grid),
                });
            } else {
                out.furniture
                    .push(world.add_body(BodyFactory::furniture(corner.x, corner.y, cell, cell)?));
            }
        }

        out.exits = self
            .exits
            .iter()
            .map(|e| ExitPoint {
                position: self.cell_center(IVec2::new(e.x, e.y)),
                requires_key: e.requires_key,
            })
            .collect();
        out.items = self
            .items
            .iter()
            .map(|i| ItemPoint {
                kind: i.kind,
                position: self.cell_center(IVec2::new(i.x, i.y)),
            })
            .collect();

        info!(
            walls = out.walls.len(),
            furniture = out.furniture.len(),
            hiding_spots = out.hiding_spots.len(),
            exits = out.exits.len(),
            items = out.items.len(),
            "level populated"
        );
        Ok(out)
    }

    /// The built-in two-floor house.
    pub fn house() -> Self {
        fn room(id: &str, name: &str, x: i32, y: i32, w: i32, h: i32, floor: u8) -> Room {
            Room {
                id: id.to_owned(),
                name: name.to_owned(),
                x,
                y,
                w,
                h,
                floor,
            }
        }
        fn object(room: &str, x: i32, y: i32, kind: ObjectKind) -> LevelObject {
            LevelObject {
                room: room.to_owned(),
                x,
                y,
                kind,
            }
        }
        fn item(x: i32, y: i32, kind: ItemKind) -> LevelItem {
            LevelItem { x, y, kind }
        }
        let door = |locked: bool, leads_to: &str| ObjectKind::Door {
            locked,
            leads_to: leads_to.to_owned(),
        };

        Self {
            cell_size: 40.0,
            width: 20,
            height: 15,
            rooms: vec![
                room("entrance", "Entrance hall", 7, 10, 6, 5, 1),
                room("livingroom", "Living room", 2, 5, 8, 5, 1),
                room("kitchen", "Kitchen", 12, 8, 6, 7, 1),
                room("garage", "Garage", 0, 10, 6, 5, 1),
                room("dining", "Dining room", 7, 5, 6, 5, 1),
                room("bedroom", "Bedroom", 2, 0, 8, 5, 2),
                room("nursery", "Nursery", 12, 0, 6, 5, 2),
                room("bathroom", "Bathroom", 7, 0, 6, 5, 2),
            ],
            objects: vec![
                object("entrance", 8, 11, door(false, "outside")),
                object("entrance", 9, 12, ObjectKind::Closet),
                object(
                    "entrance",
                    10,
                    11,
                    ObjectKind::Stairs {
                        leads_to: "floor2".to_owned(),
                    },
                ),
                object("livingroom", 4, 6, ObjectKind::Sofa),
                object("livingroom", 5, 7, ObjectKind::Table),
                object("livingroom", 6, 6, ObjectKind::Fireplace),
                object("kitchen", 14, 10, ObjectKind::Refrigerator),
                object("kitchen", 13, 11, ObjectKind::Table),
                object("kitchen", 15, 9, door(true, "backyard")),
                object("garage", 2, 12, ObjectKind::Car),
                object("garage", 3, 11, ObjectKind::Workbench),
                object("bedroom", 4, 2, ObjectKind::Bed),
                object("bedroom", 5, 1, ObjectKind::Closet),
                object("nursery", 14, 2, ObjectKind::Crib),
                object("nursery", 13, 1, ObjectKind::Toybox),
                object("entrance", 8, 13, ObjectKind::Trap { active: false }),
                object("livingroom", 3, 7, ObjectKind::Trap { active: false }),
                object("kitchen", 14, 12, ObjectKind::Trap { active: false }),
            ],
            exits: vec![Exit {
                x: 8,
                y: 14,
                room: "entrance".to_owned(),
                requires_key: true,
            }],
            items: vec![
                item(1, 13, ItemKind::Key),
                item(16, 12, ItemKind::Key),
                item(5, 3, ItemKind::Flashlight),
                item(9, 7, ItemKind::Flashlight),
                item(9, 2, ItemKind::Medkit),
                item(15, 3, ItemKind::Medkit),
                item(3, 8, ItemKind::Trap),
                item(11, 13, ItemKind::Trap),
            ],
        }
    }
}
