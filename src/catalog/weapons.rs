//! Weapon registry, evolution links and fusion recipes

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{Element, PlayerClass};

/// Weapon category (decides how an attack is spawned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Melee,
    Ranged,
    Magic,
}

/// Static evolution mapping for a base weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionLink {
    /// Upgrade level needed before evolution is offered
    pub required_level: u32,
    /// Id of the evolved template
    pub target_id: String,
}

/// A weapon instance (templates in the registry have `upgrade_level == 0`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: WeaponKind,
    pub damage: u32,
    /// Frames between attacks (lower = faster, never below 1)
    pub attack_speed: u32,
    pub range: u32,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub elemental_damage: Option<u32>,
    #[serde(default)]
    pub projectile_count: Option<u32>,
    #[serde(default)]
    pub piercing: bool,
    #[serde(default)]
    pub upgrade_level: u32,
    #[serde(default)]
    pub is_evolved: bool,
    #[serde(default)]
    pub evolution: Option<EvolutionLink>,
    /// Only obtainable through fusion
    #[serde(default)]
    pub fusion_only: bool,
}

impl Weapon {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        kind: WeaponKind,
        damage: u32,
        attack_speed: u32,
        range: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind,
            damage,
            attack_speed,
            range,
            element: None,
            elemental_damage: None,
            projectile_count: None,
            piercing: false,
            upgrade_level: 0,
            is_evolved: false,
            evolution: None,
            fusion_only: false,
        }
    }

    fn with_element(mut self, element: Element, damage: u32) -> Self {
        self.element = Some(element);
        self.elemental_damage = Some(damage);
        self
    }

    fn with_projectiles(mut self, count: u32) -> Self {
        self.projectile_count = Some(count);
        self
    }

    fn with_piercing(mut self) -> Self {
        self.piercing = true;
        self
    }

    fn evolves_to(mut self, target_id: &str, required_level: u32) -> Self {
        self.evolution = Some(EvolutionLink {
            required_level,
            target_id: target_id.to_string(),
        });
        self
    }

    fn evolved(mut self) -> Self {
        self.is_evolved = true;
        self
    }

    fn fusion_result(mut self) -> Self {
        self.fusion_only = true;
        self
    }

    /// Projectiles fired per attack (at least one)
    pub fn shots(&self) -> u32 {
        self.projectile_count.unwrap_or(1).max(1)
    }

    /// Whether this weapon can drop as a plain "new weapon" reward
    pub fn is_droppable(&self) -> bool {
        !self.is_evolved && !self.fusion_only
    }
}

/// Fusion recipe: two ingredient ids (unordered) produce `result_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusionRecipe {
    pub first: &'static str,
    pub second: &'static str,
    pub result_id: &'static str,
    /// Restricts the recipe to one class
    pub class: Option<PlayerClass>,
}

impl FusionRecipe {
    /// Whether the ingredient pair matches this recipe (either order)
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn allows_class(&self, class: PlayerClass) -> bool {
        self.class.is_none_or(|c| c == class)
    }
}

static WEAPONS: LazyLock<Vec<Weapon>> = LazyLock::new(build_weapons);

static FUSION_RECIPES: [FusionRecipe; 6] = [
    FusionRecipe {
        first: "iron_sword",
        second: "apprentice_staff",
        result_id: "flame_blade",
        class: None,
    },
    FusionRecipe {
        first: "short_bow",
        second: "frost_wand",
        result_id: "frost_bow",
        class: None,
    },
    FusionRecipe {
        first: "twin_daggers",
        second: "serrated_dagger",
        result_id: "blood_fangs",
        class: None,
    },
    FusionRecipe {
        first: "war_hammer",
        second: "thunder_rod",
        result_id: "thunder_maul",
        class: None,
    },
    FusionRecipe {
        first: "crossbow",
        second: "war_hammer",
        result_id: "dragon_slayer",
        class: None,
    },
    FusionRecipe {
        first: "blade_of_valor",
        second: "holy_staff",
        result_id: "excalibur",
        class: Some(PlayerClass::Warrior),
    },
];

fn build_weapons() -> Vec<Weapon> {
    use Element::*;
    use WeaponKind::*;

    vec![
        // Melee
        Weapon::new("iron_sword", "Iron Sword", "A dependable blade.", Melee, 12, 30, 70)
            .evolves_to("blade_of_valor", 5),
        Weapon::new("war_hammer", "War Hammer", "Slow, crushing blows that knock foes back.", Melee, 20, 50, 60)
            .evolves_to("earthshaker", 5),
        Weapon::new("twin_daggers", "Twin Daggers", "Quick strikes that sometimes land twice.", Melee, 7, 15, 45)
            .evolves_to("shadow_fangs", 5),
        Weapon::new("vampire_blade", "Vampire Blade", "Drinks the blood of its target.", Melee, 11, 28, 60)
            .evolves_to("blood_reaper", 7),
        Weapon::new("serrated_dagger", "Serrated Dagger", "Leaves bleeding wounds.", Melee, 8, 18, 50)
            .evolves_to("ripper", 5),
        // Ranged
        Weapon::new("short_bow", "Short Bow", "A light bow.", Ranged, 9, 25, 500)
            .with_projectiles(1)
            .evolves_to("storm_bow", 5),
        Weapon::new("crossbow", "Crossbow", "Heavy bolts that punch through armor.", Ranged, 15, 40, 600)
            .with_piercing()
            .evolves_to("siege_arbalest", 6),
        Weapon::new("throwing_knives", "Throwing Knives", "A fan of small blades.", Ranged, 6, 18, 400)
            .with_projectiles(3),
        // Magic
        Weapon::new("apprentice_staff", "Apprentice Staff", "Hurls small fire bolts.", Magic, 10, 35, 450)
            .with_element(Fire, 4)
            .evolves_to("inferno_staff", 5),
        Weapon::new("frost_wand", "Frost Wand", "Chills whatever it touches.", Magic, 8, 30, 450)
            .with_element(Ice, 6)
            .evolves_to("glacier_scepter", 5),
        Weapon::new("thunder_rod", "Thunder Rod", "Crackling bolts that may stun.", Magic, 12, 45, 400)
            .with_element(Lightning, 6)
            .evolves_to("tempest_rod", 5),
        Weapon::new("holy_staff", "Holy Staff", "Mends its wielder on every hit.", Magic, 9, 35, 400)
            .with_element(Holy, 4),
        // Evolved
        Weapon::new("blade_of_valor", "Blade of Valor", "An iron sword reforged by battle.", Melee, 30, 26, 85)
            .evolved(),
        Weapon::new("earthshaker", "Earthshaker", "Every swing shakes the ground.", Melee, 48, 44, 75)
            .evolved(),
        Weapon::new("shadow_fangs", "Shadow Fangs", "Daggers that strike from the dark.", Melee, 18, 12, 55)
            .with_element(Dark, 5)
            .evolved(),
        Weapon::new("blood_reaper", "Blood Reaper", "A scythe that feeds on carnage.", Melee, 28, 26, 80)
            .evolved(),
        Weapon::new("ripper", "Ripper", "Wounds that never close.", Melee, 20, 16, 60)
            .evolved(),
        Weapon::new("storm_bow", "Storm Bow", "Looses a volley of charged arrows.", Ranged, 20, 22, 600)
            .with_projectiles(3)
            .with_element(Lightning, 5)
            .evolved(),
        Weapon::new("siege_arbalest", "Siege Arbalest", "Built to bring down giants.", Ranged, 36, 38, 700)
            .with_piercing()
            .evolved(),
        Weapon::new("inferno_staff", "Inferno Staff", "Fire that lingers.", Magic, 24, 32, 500)
            .with_element(Fire, 12)
            .evolved(),
        Weapon::new("glacier_scepter", "Glacier Scepter", "Freezes the air itself.", Magic, 20, 28, 500)
            .with_element(Ice, 14)
            .evolved(),
        Weapon::new("tempest_rod", "Tempest Rod", "Calls down the storm.", Magic, 28, 40, 450)
            .with_element(Lightning, 14)
            .evolved(),
        // Fusion results
        Weapon::new("flame_blade", "Flame Blade", "A sword wreathed in fire.", Melee, 26, 28, 80)
            .with_element(Fire, 10)
            .fusion_result(),
        Weapon::new("frost_bow", "Frost Bow", "Arrows of ice.", Ranged, 18, 24, 550)
            .with_projectiles(2)
            .with_element(Ice, 8)
            .fusion_result(),
        Weapon::new("blood_fangs", "Blood Fangs", "Twin blades that open deep wounds.", Melee, 16, 14, 50)
            .fusion_result(),
        Weapon::new("thunder_maul", "Thunder Maul", "A hammer that carries the storm.", Melee, 38, 46, 70)
            .with_element(Lightning, 12)
            .fusion_result(),
        Weapon::new("dragon_slayer", "Dragon Slayer", "Forged to fell the largest foes.", Ranged, 34, 42, 650)
            .with_piercing()
            .fusion_result(),
        Weapon::new("excalibur", "Excalibur", "The blade of kings.", Melee, 70, 20, 100)
            .with_element(Holy, 25)
            .evolved()
            .fusion_result(),
    ]
}

/// Every weapon template
pub fn all_weapons() -> &'static [Weapon] {
    &WEAPONS
}

/// Look up a weapon template by id
pub fn find_weapon(id: &str) -> Option<&'static Weapon> {
    WEAPONS.iter().find(|w| w.id == id)
}

/// Evolution mapping for a weapon id, if any
pub fn evolution_for(id: &str) -> Option<&'static EvolutionLink> {
    find_weapon(id).and_then(|w| w.evolution.as_ref())
}

/// Every fusion recipe
pub fn fusion_recipes() -> &'static [FusionRecipe] {
    &FUSION_RECIPES
}

/// Recipe combining two weapon ids (either order), ignoring class restrictions
pub fn find_fusion(a: &str, b: &str) -> Option<&'static FusionRecipe> {
    FUSION_RECIPES.iter().find(|r| r.matches(a, b))
}
