//! Built-in spell catalogue.

use std::collections::BTreeMap;

use game_core::state::Element;
use game_core::{SpellDefinition, SpellEffect, SpellEffectKind, SpellOracle};

/// Spells keyed by id, kept in registration order for listing.
#[derive(Clone, Debug, Default)]
pub struct SpellCatalog {
    spells: Vec<SpellDefinition>,
    index: BTreeMap<String, usize>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalogue from definitions. A later duplicate id replaces the
    /// earlier definition.
    pub fn from_definitions(definitions: impl IntoIterator<Item = SpellDefinition>) -> Self {
        let mut catalog = Self::new();
        for spell in definitions {
            catalog.insert(spell);
        }
        catalog
    }

    /// Every player and monster spell shipped with the game.
    pub fn builtin() -> Self {
        Self::from_definitions(builtin_spells())
    }

    pub fn insert(&mut self, spell: SpellDefinition) {
        match self.index.get(&spell.id) {
            Some(&i) => self.spells[i] = spell,
            None => {
                self.index.insert(spell.id.clone(), self.spells.len());
                self.spells.push(spell);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.spells.iter()
    }
}

impl SpellOracle for SpellCatalog {
    fn spell(&self, id: &str) -> Option<&SpellDefinition> {
        self.index.get(id).map(|&i| &self.spells[i])
    }

    fn spell_ids(&self) -> Vec<&str> {
        self.spells.iter().map(|s| s.id.as_str()).collect()
    }
}

fn def(
    id: &str,
    name: &str,
    description: &str,
    mana_cost: u32,
    cooldown: u32,
    element: Element,
    effect: SpellEffect,
) -> SpellDefinition {
    SpellDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        mana_cost,
        cooldown,
        element,
        effect,
    }
}

fn builtin_spells() -> Vec<SpellDefinition> {
    use Element::{Air, Earth, Fire, None as Neutral, Water};
    use SpellEffectKind::*;
    let once = SpellEffect::new;
    let lasting = SpellEffect::lasting;

    vec![
        // Tank starters
        def("spell-mutex-lock", "Mutex Lock", "Acquire a lock, generating a protective shield.", 10, 0, Earth, once(Shield, 20)),
        def("spell-load-balancer", "Load Balancer", "Distribute threat evenly. Forces enemy to target you.", 15, 2, Neutral, lasting(Taunt, 0, 2)),
        def("spell-firewall", "Firewall", "Raise a firewall that absorbs incoming damage for the team.", 20, 3, Fire, once(Shield, 15)),
        def("spell-deadlock", "Deadlock", "Lock the enemy in a circular wait. Stuns for 1 turn.", 25, 4, Earth, lasting(Debuff, 0, 1)),
        // Healer starters
        def("spell-try-catch", "Try-Catch", "Wrap the wound in error handling. Restores HP.", 15, 0, Water, once(Heal, 30)),
        def("spell-rollback", "Rollback", "Revert to a previous state. Massive heal.", 35, 5, Water, once(Revive, 50)),
        def("spell-garbage-collect", "Garbage Collect", "Clean up all status ailments.", 20, 3, Air, once(Cleanse, 0)),
        def("spell-patch", "Patch", "Apply a quick fix. Heal over time.", 12, 1, Water, lasting(Heal, 10, 3)),
        // Dps starters
        def("spell-sql-injection", "SQL Injection", "Inject malicious queries directly into the target.", 20, 0, Fire, once(Damage, 40)),
        def("spell-fork-bomb", "Fork Bomb", "Spawn infinite processes. Damages all enemies.", 30, 3, Fire, once(AoeDamage, 25)),
        def("spell-buffer-overflow", "Buffer Overflow", "Write past the boundary. Poison damage over time.", 18, 2, Earth, lasting(Dot, 12, 3)),
        def("spell-regex-nuke", "Regex Nuke", "Catastrophic backtracking obliterates the target.", 40, 5, Air, once(Damage, 65)),
        // Tank unlocks
        def("spell-docker-compose", "Docker Compose", "Orchestrate a multi-container defense.", 30, 4, Earth, once(Shield, 40)),
        def("spell-kubernetes", "Kubernetes", "Self-healing infrastructure. Regen over time.", 25, 4, Water, lasting(Heal, 15, 4)),
        def("spell-terraform", "Terraform", "Infrastructure as code. Massive shield.", 35, 5, Earth, once(Shield, 55)),
        def("spell-circuit-breaker", "Circuit Breaker", "Stop cascading failures. Reduces incoming damage.", 20, 3, Neutral, lasting(Buff, 5, 3)),
        def("spell-chaos-monkey", "Chaos Monkey", "Randomly disable enemy abilities.", 30, 4, Air, lasting(Debuff, 0, 2)),
        def("spell-immutable-infra", "Immutable Infrastructure", "Nothing can be changed. Ultimate defense.", 45, 6, Earth, once(Shield, 80)),
        // Healer unlocks
        def("spell-lint-fix", "Lint Fix", "Auto-fix minor issues. Small heal.", 8, 0, Air, once(Heal, 15)),
        def("spell-bisect", "Git Bisect", "Binary search for the root cause. Reveals enemy weakness.", 15, 3, Neutral, lasting(Debuff, 3, 3)),
        def("spell-hot-reload", "Hot Reload", "Swap code without restart. Instant heal burst.", 25, 3, Fire, once(Heal, 45)),
        def("spell-snapshot-restore", "Snapshot Restore", "Restore from a saved snapshot. Full cleanse + heal.", 40, 5, Water, once(Heal, 60)),
        def("spell-time-travel-debug", "Time-Travel Debug", "Step back through execution. Revive with half HP.", 50, 8, Air, once(Revive, 50)),
        def("spell-formal-verification", "Formal Verification", "Mathematically prove correctness. Full heal.", 60, 10, Neutral, once(Heal, 100)),
        // Dps unlocks
        def("spell-zero-day", "Zero Day", "Exploit an unknown vulnerability.", 22, 2, Fire, once(Damage, 45)),
        def("spell-privilege-escalation", "Privilege Escalation", "Gain elevated access. Buff attack power.", 18, 3, Neutral, lasting(Buff, 5, 3)),
        def("spell-ddos", "DDoS", "Overwhelm with requests. AoE damage.", 35, 4, Air, once(AoeDamage, 35)),
        def("spell-cryptominer", "Cryptominer", "Steal CPU cycles. Damage + drain.", 25, 3, Earth, lasting(Dot, 18, 3)),
        def("spell-rootkit", "Rootkit", "Deep system compromise. Heavy single-target damage.", 45, 5, Fire, once(Damage, 75)),
        def("spell-quantum-crack", "Quantum Crack", "Break all encryption simultaneously. Ultimate damage.", 60, 8, Air, once(Damage, 100)),
        // Monster spells
        def("spell-null-deref", "Null Dereference", "Access nothing. Deals damage.", 0, 0, Neutral, once(Damage, 15)),
        def("spell-heap-grow", "Heap Growth", "Memory expands. Monster gets stronger.", 0, 2, Earth, lasting(Buff, 3, 99)),
        def("spell-thread-swap", "Thread Swap", "Context switch at the worst time. Double attack.", 0, 2, Air, once(Damage, 20)),
        def("spell-fence-post", "Fence Post", "Off by one. Sometimes hits, sometimes misses.", 0, 0, Neutral, once(Damage, 18)),
        def("spell-segfault", "Segfault", "Illegal memory access. Heavy damage.", 0, 3, Earth, once(Damage, 35)),
        def("spell-oom-kill", "OOM Killer", "Out of memory. Kills the largest process.", 0, 4, Earth, once(Damage, 50)),
        def("spell-deadlock-boss", "System Deadlock", "All threads locked. Stun.", 0, 5, Earth, lasting(Debuff, 0, 1)),
        def("spell-stack-smash", "Stack Smash", "Corrupt the call stack. Damages and poisons.", 0, 3, Fire, lasting(Dot, 10, 3)),
    ]
}

/// Glyph drawn to conjure a spell at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SpellShape {
    Circle,
    Triangle,
    Square,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SpellModifier {
    Swift,
    Heavy,
    Precise,
    Chaotic,
}

/// Shape, element and modifier of a conjured spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSymbol {
    pub shape: SpellShape,
    pub element: Element,
    pub modifier: SpellModifier,
}

const GENERATED_BASE_POWER: f64 = 20.0;
const GENERATED_BASE_COST: f64 = 15.0;

/// Builds a spell from a symbol. `serial` makes the id unique per caller.
///
/// Circles heal, triangles damage, squares shield and stars buff. The
/// element scales power and the modifier scales cost and cooldown.
pub fn generate_spell(symbol: SpellSymbol, serial: u32) -> SpellDefinition {
    let power_multiplier = match symbol.element {
        Element::Fire => 1.5,
        Element::Earth => 1.2,
        Element::Air => 0.8,
        Element::Water | Element::None => 1.0,
    };
    let (cost_multiplier, cooldown) = match symbol.modifier {
        SpellModifier::Swift => (0.8, 0),
        SpellModifier::Heavy => (1.5, 2),
        SpellModifier::Precise => (1.2, 1),
        SpellModifier::Chaotic => (0.9, 1),
    };
    let kind = match symbol.shape {
        SpellShape::Circle => SpellEffectKind::Heal,
        SpellShape::Triangle => SpellEffectKind::Damage,
        SpellShape::Square => SpellEffectKind::Shield,
        SpellShape::Star => SpellEffectKind::Buff,
    };

    SpellDefinition {
        id: format!("spell-gen-{serial}"),
        name: format!(
            "{} {} {}",
            capitalize(symbol.modifier.as_ref()),
            capitalize(symbol.element.as_ref()),
            capitalize(symbol.shape.as_ref())
        ),
        description: format!(
            "A {} {}-aspected {} spell.",
            symbol.modifier, symbol.element, symbol.shape
        ),
        mana_cost: (GENERATED_BASE_COST * cost_multiplier).floor() as u32,
        cooldown,
        element: symbol.element,
        effect: SpellEffect::new(kind, (GENERATED_BASE_POWER * power_multiplier).floor() as u32),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogue_has_every_spell() {
        let catalog = SpellCatalog::builtin();
        assert_eq!(catalog.len(), 38);
        assert_eq!(catalog.spell_ids().len(), 38);
        let nuke = catalog.spell("spell-regex-nuke").expect("registered");
        assert_eq!(nuke.mana_cost, 40);
        assert_eq!(nuke.effect, SpellEffect::new(SpellEffectKind::Damage, 65));
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut catalog = SpellCatalog::builtin();
        let mut patched = catalog.spell("spell-patch").cloned().expect("registered");
        patched.mana_cost = 1;
        catalog.insert(patched);
        assert_eq!(catalog.len(), 38);
        assert_eq!(catalog.spell("spell-patch").map(|s| s.mana_cost), Some(1));
    }

    #[test]
    fn heavy_fire_triangle() {
        let spell = generate_spell(
            SpellSymbol {
                shape: SpellShape::Triangle,
                element: Element::Fire,
                modifier: SpellModifier::Heavy,
            },
            7,
        );
        assert_eq!(spell.id, "spell-gen-7");
        assert_eq!(spell.name, "Heavy Fire Triangle");
        assert_eq!(spell.mana_cost, 22);
        assert_eq!(spell.cooldown, 2);
        assert_eq!(spell.effect, SpellEffect::new(SpellEffectKind::Damage, 30));
    }
}
