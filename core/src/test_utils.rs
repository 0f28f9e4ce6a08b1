//! Shared test utilities for integration and unit tests

use hashbrown::HashMap;

use crate::session::{
    Door, Entity, EntityFlags, EntityId, GameRules, InventorySlot, Level, Light, Line, MapLoader,
    MiscFlags, Plat, PlatStatus, PlayerClass, PolyEvent, Polyobject, ScriptContext, ScriptInfo,
    ScriptModule, ScriptRunState, Sector, Session, Side, SoundOrigin, SoundSequence, SpecialValue,
    Thinker, WaitState,
};

/// Map used by [`fixture_session`]
pub const TEST_MAP: &str = "MAP02";

// ============================================================================
// Collaborators
// ============================================================================

/// Map loader serving prebuilt levels
pub struct TestMapLoader {
    levels: HashMap<String, Level>,
    pub loads: u32,
}

impl TestMapLoader {
    pub fn new() -> Self {
        Self {
            levels: HashMap::new(),
            loads: 0,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.levels.insert(level.name.clone(), level);
        self
    }
}

impl Default for TestMapLoader {
    /// Serves [`base_level`]
    fn default() -> Self {
        Self::new().with_level(base_level())
    }
}

impl MapLoader for TestMapLoader {
    fn load_level(&mut self, map: &str) -> Option<Level> {
        self.loads += 1;
        self.levels.get(map).cloned()
    }
}

/// Script module with scripts `1..=16`, each 64 bytes long
pub struct TestScriptModule {
    pub script_count: i32,
}

impl Default for TestScriptModule {
    fn default() -> Self {
        Self { script_count: 16 }
    }
}

impl ScriptModule for TestScriptModule {
    fn entry_point(&self, number: i32) -> Option<u32> {
        (1..=self.script_count)
            .contains(&number)
            .then(|| (number as u32 - 1) * 64)
    }

    fn code_len(&self) -> u32 {
        self.script_count as u32 * 64
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Freshly loaded geometry for [`TEST_MAP`]
pub fn base_level() -> Level {
    let mut level = Level::new(TEST_MAP);
    level.sectors = (0..8)
        .map(|i| Sector {
            floor_height: 0,
            ceiling_height: 128 << 16,
            floor_texture: "FLOOR0_1".into(),
            ceiling_texture: "CEIL1_1".into(),
            light_level: 160,
            tag: i as i16,
            ..Default::default()
        })
        .collect();
    level.sides = (0..16)
        .map(|_| Side {
            top_texture: "-".into(),
            bottom_texture: "-".into(),
            mid_texture: "STONE2".into(),
            ..Default::default()
        })
        .collect();
    level.lines = (0..12)
        .map(|i| Line {
            flags: 1,
            front: Some(i),
            back: (i < 4).then_some(12 + i),
            ..Default::default()
        })
        .collect();
    level.polyobjs = (1..=3)
        .map(|tag| Polyobject {
            tag,
            x: (tag * 64) << 16,
            y: 0,
            ..Default::default()
        })
        .collect();
    level
}

/// A mid-game session touching every archived subsystem
///
/// Contains a removed entity (leaving a gap in the arena), references to it,
/// references to the local player's body and forward references.
pub fn fixture_session() -> Session {
    let mut session = Session::new(base_level());
    session.rules = GameRules {
        skill: 2,
        ..Default::default()
    };
    session.level_time = 3500;

    // World deltas
    let level = &mut session.level;
    level.sectors[3].ceiling_height = 72 << 16;
    level.sectors[5].floor_texture = "NUKAGE1".into();
    level.sectors[5].light_level = 255;
    level.sectors[6].special = 9;
    level.lines[2].special = 80;
    level.lines[2].args = [7, 0, 0, 0, 0];
    level.sides[7].mid_texture = "SW1ON".into();
    level.sides[7].texture_offset = 16 << 16;
    level.polyobjs[1].reposition(0x4000_0000, 96 << 16, 32 << 16);

    // Player 0 and their body
    let body = session.entities.insert(Entity {
        kind: 1,
        x: 32 << 16,
        y: 64 << 16,
        health: 100,
        flags: EntityFlags::SOLID | EntityFlags::SHOOTABLE | EntityFlags::PICKUP,
        sector: Some(0),
        radius: 16 << 16,
        height: 56 << 16,
        player: Some(0),
        ..Default::default()
    });
    let player = &mut session.players[0];
    player.in_game = true;
    player.mo = Some(body);
    player.class = PlayerClass::Cleric;
    player.health = 100;
    player.armor_points = [0, 5, 10, 0];
    player.inventory.push(InventorySlot { item: 3, count: 2 });
    player.inventory.push(InventorySlot { item: 9, count: 1 });
    player.ready_item = 3;
    player.keys = 0b101;
    player.weapons = 0b0011;
    player.mana = [50, 25];
    player.view_height = 48 << 16;
    player.powers[2] = 700;

    // A doomed entity, removed below to leave a gap
    let doomed = session.entities.insert(Entity {
        kind: 31,
        sector: Some(1),
        ..Default::default()
    });

    let mut monsters = Vec::new();
    for i in 0..4 {
        monsters.push(session.entities.insert(Entity {
            kind: 10 + i,
            x: (i as i32 * 100) << 16,
            health: 60,
            tics: 4,
            state: 120 + i as u32,
            tid: i as i16,
            flags: EntityFlags::SOLID | EntityFlags::SHOOTABLE | EntityFlags::COUNTKILL,
            sector: Some(i as usize + 2),
            target: Some(body),
            ..Default::default()
        }));
    }
    session.players[0].attacker = Some(monsters[1]);

    // Missile fired by monster 0 at the player, tracking monster 3 (a forward reference)
    let missile = session.entities.insert(Entity {
        kind: 77,
        flags: EntityFlags::MISSILE | EntityFlags::NOGRAVITY | EntityFlags::DROPOFF,
        mom_x: 8 << 16,
        sector: Some(2),
        target: Some(monsters[0]),
        tracer: Some(body),
        special1: SpecialValue::Entity(Some(monsters[3])),
        special2: SpecialValue::Int(7),
        ..Default::default()
    });
    if let Some(m) = session.entities.get_mut(monsters[0]) {
        m.tracer = Some(missile);
    }
    if let Some(m) = session.entities.get_mut(monsters[2]) {
        m.target = Some(doomed);
        m.special1 = SpecialValue::Entity(Some(doomed));
    }
    session.entities.remove(doomed);

    // Movers
    session.add_thinker(Thinker::Door(Door {
        sector: 3,
        kind: 1,
        speed: 2 << 16,
        direction: -1,
        top_height: 124 << 16,
        top_wait: 150,
        top_countdown: 0,
    }));
    session.add_thinker(Thinker::Light(Light {
        sector: 5,
        kind: 2,
        value1: 120,
        value2: 255,
        tics1: 5,
        tics2: 10,
        count: 3,
    }));
    session.add_thinker(Thinker::Plat(Plat {
        sector: 4,
        speed: 4 << 16,
        high: 64 << 16,
        wait: 105,
        count: 30,
        status: PlatStatus::Waiting,
        old_status: PlatStatus::Up,
        tag: 4,
        ..Default::default()
    }));
    session.add_thinker(Thinker::RotatePoly(PolyEvent {
        polyobj: 1,
        speed: 4,
        dist: 0x2000_0000,
        ..Default::default()
    }));

    // Scripts
    let mut waiting = ScriptContext::new(2, 140);
    waiting.wait = WaitState::Tag(7);
    waiting.activator = Some(body);
    waiting.line = Some(2);
    waiting.locals[0] = 3;
    let mut delayed = ScriptContext::new(5, 300);
    delayed.delay_count = 70;
    delayed.activator = Some(monsters[2]);
    delayed.stack[0] = 42;
    delayed.stack_ptr = 1;
    session.scripts.interpreters = vec![waiting, delayed];
    session.scripts.infos = vec![
        ScriptInfo {
            number: 2,
            state: ScriptRunState::Suspended,
        },
        ScriptInfo {
            number: 5,
            state: ScriptRunState::Running,
        },
        ScriptInfo {
            number: 9,
            state: ScriptRunState::Inactive,
        },
    ];
    session.scripts.map_vars[0] = 1;
    session.scripts.map_vars[31] = -9;
    session.scripts.world_vars[4] = 1000;

    // Sounds
    session.sounds = vec![
        SoundSequence {
            sequence: 3,
            script_offset: 12,
            delay_tics: 5,
            volume: 0.75,
            current_sound: 40,
            origin: SoundOrigin::Entity(Some(monsters[3])),
        },
        SoundSequence {
            sequence: 1,
            volume: 1.0,
            origin: SoundOrigin::Sector(3),
            ..Default::default()
        },
        SoundSequence {
            sequence: 8,
            volume: 0.5,
            origin: SoundOrigin::Polyobject(1),
            ..Default::default()
        },
    ];

    session.misc.world_timer = 9000;
    session.misc.quake[0] = 2;
    session.misc.random_index = 77;
    session.misc.flags = MiscFlags::LIGHTNING;
    session
}

// ============================================================================
// Comparison
// ============================================================================

/// Live entity ids by sweep position
fn positions(session: &Session) -> HashMap<EntityId, usize> {
    session
        .entities
        .ids()
        .into_iter()
        .enumerate()
        .map(|(n, id)| (id, n))
        .collect()
}

/// Assert two sessions hold the same state
///
/// Entity ids are compared by sweep position, so a restored session (whose
/// arena has no gaps) matches the original it was saved from. References to
/// entities that are not live compare as null.
pub fn assert_sessions_equivalent(a: &Session, b: &Session) {
    let pos_a = positions(a);
    let pos_b = positions(b);
    let ra = |id: Option<EntityId>| id.and_then(|id| pos_a.get(&id).copied());
    let rb = |id: Option<EntityId>| id.and_then(|id| pos_b.get(&id).copied());
    let special_a = |v: SpecialValue| match v {
        SpecialValue::Int(i) => (0, Some(i as i64)),
        SpecialValue::Entity(id) => (1, ra(id).map(|n| n as i64)),
    };
    let special_b = |v: SpecialValue| match v {
        SpecialValue::Int(i) => (0, Some(i as i64)),
        SpecialValue::Entity(id) => (1, rb(id).map(|n| n as i64)),
    };
    let origin_a = |o: SoundOrigin| match o {
        SoundOrigin::Entity(id) => (1, ra(id)),
        SoundOrigin::None => (0, None),
        SoundOrigin::Sector(s) => (2, Some(s)),
        SoundOrigin::Polyobject(p) => (3, Some(p)),
    };
    let origin_b = |o: SoundOrigin| match o {
        SoundOrigin::Entity(id) => (1, rb(id)),
        SoundOrigin::None => (0, None),
        SoundOrigin::Sector(s) => (2, Some(s)),
        SoundOrigin::Polyobject(p) => (3, Some(p)),
    };

    assert_eq!(a.rules, b.rules);
    assert_eq!(a.level_time, b.level_time);
    assert_eq!(a.level, b.level);

    assert_eq!(a.entities.len(), b.entities.len());
    for (n, ((_, ea), (_, eb))) in a.entities.iter().zip(b.entities.iter()).enumerate() {
        assert_eq!(ra(ea.target), rb(eb.target), "entity {} target", n);
        assert_eq!(ra(ea.tracer), rb(eb.tracer), "entity {} tracer", n);
        assert_eq!(special_a(ea.special1), special_b(eb.special1), "entity {} special1", n);
        assert_eq!(special_a(ea.special2), special_b(eb.special2), "entity {} special2", n);
        let strip = |e: &Entity| Entity {
            target: None,
            tracer: None,
            special1: SpecialValue::default(),
            special2: SpecialValue::default(),
            ..e.clone()
        };
        assert_eq!(strip(ea), strip(eb), "entity {}", n);
    }

    assert_eq!(a.thinkers, b.thinkers);

    assert_eq!(a.scripts.infos, b.scripts.infos);
    assert_eq!(a.scripts.map_vars, b.scripts.map_vars);
    assert_eq!(a.scripts.world_vars, b.scripts.world_vars);
    assert_eq!(a.scripts.store, b.scripts.store);
    assert_eq!(a.scripts.interpreters.len(), b.scripts.interpreters.len());
    for (sa, sb) in a.scripts.interpreters.iter().zip(&b.scripts.interpreters) {
        assert_eq!(ra(sa.activator), rb(sb.activator), "script {} activator", sa.number);
        let mut sa = sa.clone();
        let mut sb = sb.clone();
        sa.activator = None;
        sb.activator = None;
        assert_eq!(sa, sb);
    }

    for (slot, (pa, pb)) in a.players.iter().zip(&b.players).enumerate() {
        assert_eq!(pa.in_game, pb.in_game, "player {} in game", slot);
        if !pa.in_game {
            continue;
        }
        assert_eq!(ra(pa.mo), rb(pb.mo), "player {} body", slot);
        assert_eq!(ra(pa.attacker), rb(pb.attacker), "player {} attacker", slot);
        let mut pa = pa.clone();
        let mut pb = pb.clone();
        pa.mo = None;
        pb.mo = None;
        pa.attacker = None;
        pb.attacker = None;
        assert_eq!(pa, pb, "player {}", slot);
    }

    assert_eq!(a.sounds.len(), b.sounds.len());
    for (sa, sb) in a.sounds.iter().zip(&b.sounds) {
        assert_eq!(origin_a(sa.origin), origin_b(sb.origin));
        let mut sa = sa.clone();
        let mut sb = sb.clone();
        sa.origin = SoundOrigin::None;
        sb.origin = SoundOrigin::None;
        assert_eq!(sa, sb);
    }

    assert_eq!(a.misc, b.misc);
}
