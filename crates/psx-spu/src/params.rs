//! The twelve editable envelope parameters
//!
//! A [`ParameterSet`] holds one [`Parameter`] per [`ParamKind`] and a
//! selection cursor. Values are bounded: edits at a range boundary are
//! ignored. The cursor wraps in both directions.

/// Number of editable parameters
pub const PARAM_COUNT: usize = 12;

/// Identity of an editable parameter, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ParamKind {
    AttackMode = 0,
    AttackShift = 1,
    AttackStep = 2,
    DecayShift = 3,
    SustainLevel = 4,
    SustainMode = 5,
    SustainDir = 6,
    SustainShift = 7,
    SustainStep = 8,
    ReleaseMode = 9,
    ReleaseShift = 10,
    Waveform = 11,
}

impl ParamKind {
    /// All kinds in display order
    pub const ALL: [ParamKind; PARAM_COUNT] = [
        ParamKind::AttackMode,
        ParamKind::AttackShift,
        ParamKind::AttackStep,
        ParamKind::DecayShift,
        ParamKind::SustainLevel,
        ParamKind::SustainMode,
        ParamKind::SustainDir,
        ParamKind::SustainShift,
        ParamKind::SustainStep,
        ParamKind::ReleaseMode,
        ParamKind::ReleaseShift,
        ParamKind::Waveform,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind at `index`, wrapping modulo [`PARAM_COUNT`]
    #[inline]
    pub const fn from_index(index: usize) -> ParamKind {
        Self::ALL[index % PARAM_COUNT]
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            ParamKind::AttackMode => "Attack Mode",
            ParamKind::AttackShift => "Attack Shift",
            ParamKind::AttackStep => "Attack Step",
            ParamKind::DecayShift => "Decay Shift",
            ParamKind::SustainLevel => "Sustain Level",
            ParamKind::SustainMode => "Sustain Mode",
            ParamKind::SustainDir => "Sustain Dir",
            ParamKind::SustainShift => "Sustain Shift",
            ParamKind::SustainStep => "Sustain Step",
            ParamKind::ReleaseMode => "Release Mode",
            ParamKind::ReleaseShift => "Release Shift",
            ParamKind::Waveform => "Waveform",
        }
    }

    /// Inclusive valid range `(min, max)`
    pub const fn range(self) -> (u8, u8) {
        match self {
            ParamKind::AttackMode
            | ParamKind::SustainMode
            | ParamKind::SustainDir
            | ParamKind::ReleaseMode
            | ParamKind::Waveform => (0x00, 0x01),
            ParamKind::AttackShift | ParamKind::SustainShift | ParamKind::ReleaseShift => {
                (0x00, 0x1F)
            }
            ParamKind::AttackStep | ParamKind::SustainStep => (0x00, 0x03),
            ParamKind::DecayShift | ParamKind::SustainLevel => (0x00, 0x0F),
        }
    }

    /// Value at startup
    pub const fn default_value(self) -> u8 {
        match self {
            ParamKind::SustainLevel => 0x0F,
            _ => 0x00,
        }
    }

    /// Whether this parameter feeds the envelope words
    #[inline]
    pub const fn is_envelope_field(self) -> bool {
        !matches!(self, ParamKind::Waveform)
    }
}

/// One parameter: immutable range plus current value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    kind: ParamKind,
    min: u8,
    max: u8,
    value: u8,
}

impl Parameter {
    /// Parameter at its default value
    pub const fn new(kind: ParamKind) -> Self {
        let (min, max) = kind.range();
        Parameter {
            kind,
            min,
            max,
            value: kind.default_value(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub const fn min(&self) -> u8 {
        self.min
    }

    #[inline]
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Step up by one unless already at the maximum
    ///
    /// Returns `true` if the value changed.
    pub fn increment(&mut self) -> bool {
        if self.value == self.max {
            return false;
        }
        self.value += 1;
        true
    }

    /// Step down by one unless already at the minimum
    ///
    /// Returns `true` if the value changed.
    pub fn decrement(&mut self) -> bool {
        if self.value == self.min {
            return false;
        }
        self.value -= 1;
        true
    }

    /// Set the value, clamped to the range
    ///
    /// Returns `true` if the value changed.
    pub fn set(&mut self, value: u8) -> bool {
        let clamped = value.clamp(self.min, self.max);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }
}

/// The full parameter table and its selection cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    params: [Parameter; PARAM_COUNT],
    selected: ParamKind,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSet {
    /// All parameters at their defaults, cursor on the first one
    pub fn new() -> Self {
        ParameterSet {
            params: ParamKind::ALL.map(Parameter::new),
            selected: ParamKind::AttackMode,
        }
    }

    #[inline]
    pub fn get(&self, kind: ParamKind) -> &Parameter {
        &self.params[kind.index()]
    }

    #[inline]
    pub fn value(&self, kind: ParamKind) -> u8 {
        self.get(kind).value()
    }

    /// Set a value, clamped to its range
    pub fn set(&mut self, kind: ParamKind, value: u8) -> bool {
        self.params[kind.index()].set(value)
    }

    /// Parameters in display order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    #[inline]
    pub fn selected(&self) -> ParamKind {
        self.selected
    }

    pub fn select(&mut self, kind: ParamKind) {
        self.selected = kind;
    }

    /// Move the cursor to the next parameter, wrapping after the last
    pub fn select_next(&mut self) -> ParamKind {
        self.selected = ParamKind::from_index(self.selected.index() + 1);
        self.selected
    }

    /// Move the cursor to the previous parameter, wrapping before the first
    pub fn select_prev(&mut self) -> ParamKind {
        self.selected = ParamKind::from_index(self.selected.index() + PARAM_COUNT - 1);
        self.selected
    }

    /// Increment the selected parameter; `true` if it changed
    pub fn increment_selected(&mut self) -> bool {
        self.params[self.selected.index()].increment()
    }

    /// Decrement the selected parameter; `true` if it changed
    pub fn decrement_selected(&mut self) -> bool {
        self.params[self.selected.index()].decrement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_order_matches_index() {
        for (i, kind) in ParamKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(ParamKind::from_index(i), *kind);
        }
    }

    #[test]
    fn test_ranges_fit_five_bits() {
        for kind in ParamKind::ALL {
            let (min, max) = kind.range();
            assert!(min <= max);
            assert!(max <= 0x1F);
            assert!((min..=max).contains(&kind.default_value()));
        }
    }

    #[test]
    fn test_cursor_cycles_forward() {
        let mut set = ParameterSet::new();
        set.select(ParamKind::DecayShift);
        for _ in 0..PARAM_COUNT {
            set.select_next();
        }
        assert_eq!(set.selected(), ParamKind::DecayShift);
    }

    #[test]
    fn test_cursor_cycles_backward() {
        let mut set = ParameterSet::new();
        set.select(ParamKind::SustainStep);
        for _ in 0..PARAM_COUNT {
            set.select_prev();
        }
        assert_eq!(set.selected(), ParamKind::SustainStep);
    }

    #[test]
    fn test_cursor_wraps_at_ends() {
        let mut set = ParameterSet::new();
        assert_eq!(set.select_prev(), ParamKind::Waveform);
        assert_eq!(set.select_next(), ParamKind::AttackMode);
    }

    #[test]
    fn test_increment_at_max_is_noop() {
        let mut set = ParameterSet::new();
        set.select(ParamKind::AttackStep);
        assert!(set.increment_selected());
        assert!(set.increment_selected());
        assert!(set.increment_selected());
        assert_eq!(set.value(ParamKind::AttackStep), 3);
        assert!(!set.increment_selected());
        assert_eq!(set.value(ParamKind::AttackStep), 3);
    }

    #[test]
    fn test_decrement_at_min_is_noop() {
        let mut set = ParameterSet::new();
        set.select(ParamKind::ReleaseShift);
        assert!(!set.decrement_selected());
        assert_eq!(set.value(ParamKind::ReleaseShift), 0);
    }

    #[test]
    fn test_values_stay_in_range_under_any_edits() {
        let mut set = ParameterSet::new();
        // Deterministic pseudo-random walk over cursor moves and edits
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..5000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            match seed >> 30 {
                0 => {
                    set.select_next();
                }
                1 => {
                    set.select_prev();
                }
                2 => {
                    set.increment_selected();
                }
                _ => {
                    set.decrement_selected();
                }
            }
            for param in set.iter() {
                assert!(param.min() <= param.value() && param.value() <= param.max());
            }
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut set = ParameterSet::new();
        assert!(set.set(ParamKind::AttackShift, 0xFF));
        assert_eq!(set.value(ParamKind::AttackShift), 0x1F);
        assert!(!set.set(ParamKind::AttackShift, 0x1F));
    }
}
