//! Flip-digit odometer readout.
//!
//! The readout is a row of persistent digit slots. Each slot keeps its
//! identity across updates; a new value only retargets the face each slot
//! shows, so the renderer can roll the old face out and the new one in.
//!
//! # Formatting
//!
//! The integer part is zero-padded to the digit count of the wider bound:
//! ```text
//! min = -40, max = 120, decimals = 0   ->   " 068"   (sign slot, 3 digits)
//! min = 0,   max = 100, decimals = 1   ->   "042.5"
//! ```
//! A sign slot exists only when the configured minimum is negative. It shows
//! `-` or a blank. On an unsigned range a value below zero shows its
//! magnitude.
//!
//! Digits come from the shortest decimal form of the value, zero-extended to
//! `decimals`, so `42.1` with ten places reads `042.1000000000` rather than
//! the binary expansion of the nearest `f32`.
//!
//! # Stepped Interpolation
//!
//! Moving from 68 to 71 does not jump. The delta is split into
//! `min(ceil(|delta|), 20)` steps rendered evenly across the animation
//! duration, so the display reads 69, 70, 71. The caller drives the steps
//! with a repeating timer (see [`RenderOutcome::Animating`]) and calls
//! [`FlipDisplay::step`] on each tick.
//!
//! # Slot Identity
//!
//! When the shape of the readout changes (2 to 3 integer digits, a widened
//! format, a unit added) the slot set is torn down and rebuilt with fresh
//! ids. A width change cannot be rolled
//! digit-by-digit.

use core::fmt::Write;

use heapless::{String, Vec};
use micromath::F32;

// =============================================================================
// Configuration
// =============================================================================

/// Maximum characters in a formatted readout (sign + digits + separator).
pub const MAX_READOUT_LEN: usize = 24;

/// Maximum slots: every readout character plus the unit label.
pub const MAX_SLOTS: usize = MAX_READOUT_LEN + 1;

/// Maximum unit label length in bytes.
pub const MAX_UNIT_LEN: usize = 8;

/// Upper bound on interpolation steps for a single transition.
pub const MAX_STEPS: u32 = 20;

/// Glyph shown in digit slots while the widget cannot read its value.
pub const PLACEHOLDER: char = '-';

/// A formatted readout.
pub type Readout = String<MAX_READOUT_LEN>;

/// Errors from formatting a value into a readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OdometerError {
    /// The value needs more characters than the slot arena holds.
    #[error("value does not fit in {MAX_READOUT_LEN} characters")]
    Overflow,
    /// NaN or infinite values have no digit representation.
    #[error("value is not finite")]
    NonFinite,
}

// =============================================================================
// Digit Slots
// =============================================================================

/// What a slot displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Sign,
    Integer,
    DecimalSeparator,
    Fraction,
    Unit,
}

/// Stable identity of a slot. Fresh ids are issued only on rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

/// One persistent character position in the readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigitSlot {
    id: SlotId,
    kind: SlotKind,
    face: char,
    /// Face shown before the last retarget, if it changed.
    previous_face: Option<char>,
}

impl DigitSlot {
    #[inline]
    pub const fn id(&self) -> SlotId { self.id }

    #[inline]
    pub const fn kind(&self) -> SlotKind { self.kind }

    #[inline]
    pub const fn face(&self) -> char { self.face }

    /// The face this slot rolled away from on the last update.
    #[inline]
    pub const fn previous_face(&self) -> Option<char> { self.previous_face }

    /// Point the slot at a new face. Returns `true` if the face changed.
    fn retarget(
        &mut self,
        face: char,
    ) -> bool {
        if self.face == face {
            self.previous_face = None;
            false
        } else {
            self.previous_face = Some(self.face);
            self.face = face;
            true
        }
    }
}

// =============================================================================
// Format
// =============================================================================

/// Fixed-width number format derived from the gauge bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OdometerFormat {
    decimals: u8,
    integer_width: usize,
    signed: bool,
}

impl OdometerFormat {
    /// Derive the format from the configured bounds and decimal places.
    pub fn new(
        min: f32,
        max: f32,
        decimals: u8,
    ) -> Self {
        let integer_width = integer_digits(min).max(integer_digits(max));
        Self {
            decimals,
            integer_width,
            signed: min < 0.0,
        }
    }

    #[inline]
    pub const fn decimals(&self) -> u8 { self.decimals }

    #[inline]
    pub const fn integer_width(&self) -> usize { self.integer_width }

    /// Whether a dedicated sign slot is always present.
    #[inline]
    pub const fn signed(&self) -> bool { self.signed }

    /// Format `value` as a zero-padded readout.
    ///
    /// A value that rounds to zero never shows a minus sign.
    pub fn format(
        &self,
        value: f32,
    ) -> Result<Readout, OdometerError> {
        if !value.is_finite() {
            return Err(OdometerError::NonFinite);
        }

        let decimals = usize::from(self.decimals);
        let width = if decimals > 0 {
            self.integer_width + 1 + decimals
        } else {
            self.integer_width
        };

        let mut body: Readout = String::new();
        write_magnitude(&mut body, value.abs(), width, decimals).map_err(|_| OdometerError::Overflow)?;

        if !self.signed {
            return Ok(body);
        }

        let negative = value < 0.0 && body.bytes().any(|b| b.is_ascii_digit() && b != b'0');
        let mut readout: Readout = String::new();
        readout
            .push(if negative { '-' } else { ' ' })
            .map_err(|_| OdometerError::Overflow)?;
        readout.push_str(&body).map_err(|_| OdometerError::Overflow)?;
        Ok(readout)
    }
}

/// Write `magnitude` zero-padded to `width` with `decimals` places.
///
/// Uses the shortest round-trip digits when they fit in `decimals`, since
/// `{:.N}` prints the exact binary value and shows noise past ~7 digits.
fn write_magnitude(
    out: &mut Readout,
    magnitude: f32,
    width: usize,
    decimals: usize,
) -> core::fmt::Result {
    let mut shortest: Readout = String::new();
    let fraction_len = match write!(shortest, "{magnitude}") {
        Ok(()) => shortest.split_once('.').map_or(0, |(_, fraction)| fraction.len()),
        Err(_) => usize::MAX,
    };
    if fraction_len > decimals {
        return write!(out, "{magnitude:0width$.decimals$}");
    }

    let separator = usize::from(decimals > 0 && fraction_len == 0);
    let len = shortest.len() + separator + (decimals - fraction_len);
    for _ in len..width {
        out.write_char('0')?;
    }
    out.write_str(&shortest)?;
    if separator == 1 {
        out.write_char('.')?;
    }
    for _ in fraction_len..decimals {
        out.write_char('0')?;
    }
    Ok(())
}

/// Digit count of `|floor(bound)|`, at least 1.
fn integer_digits(bound: f32) -> usize {
    let magnitude = F32(bound).floor().0.abs();
    let mut n = magnitude as u64;
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Slot kinds for a readout, in display order.
fn slot_kinds(
    readout: &str,
    signed: bool,
    with_unit: bool,
) -> Vec<SlotKind, MAX_SLOTS> {
    let mut kinds = Vec::new();
    let mut after_separator = false;
    for (i, c) in readout.chars().enumerate() {
        let kind = match c {
            '.' => {
                after_separator = true;
                SlotKind::DecimalSeparator
            }
            '-' | ' ' if i == 0 && signed => SlotKind::Sign,
            _ if after_separator => SlotKind::Fraction,
            _ => SlotKind::Integer,
        };
        kinds.push(kind).ok();
    }
    if with_unit {
        kinds.push(SlotKind::Unit).ok();
    }
    kinds
}

// =============================================================================
// Animation
// =============================================================================

/// One value transition, stepped from `from_value` to `to_value`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OdometerAnimation {
    from_value: f32,
    to_value: f32,
    step_count: u32,
    current_step: u32,
}

impl OdometerAnimation {
    /// Plan a transition with `min(ceil(|to - from|), MAX_STEPS)` steps.
    pub fn new(
        from_value: f32,
        to_value: f32,
    ) -> Self {
        let delta = (to_value - from_value).abs();
        let steps = F32(delta).ceil().0.min(MAX_STEPS as f32);
        Self {
            from_value,
            to_value,
            step_count: steps as u32,
            current_step: 0,
        }
    }

    #[inline]
    pub const fn from_value(&self) -> f32 { self.from_value }

    #[inline]
    pub const fn to_value(&self) -> f32 { self.to_value }

    #[inline]
    pub const fn step_count(&self) -> u32 { self.step_count }

    #[inline]
    pub const fn current_step(&self) -> u32 { self.current_step }

    #[inline]
    pub const fn is_finished(&self) -> bool { self.current_step >= self.step_count }

    /// Timer period that spreads the steps evenly over `duration_ms`.
    #[inline]
    pub const fn interval_ms(
        &self,
        duration_ms: u32,
    ) -> u32 {
        if self.step_count == 0 {
            duration_ms
        } else {
            duration_ms / self.step_count
        }
    }

    /// Advance one step and return the interpolated value.
    ///
    /// The final step returns `to_value` exactly.
    pub fn next_value(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        self.current_step += 1;
        if self.is_finished() {
            return Some(self.to_value);
        }
        let t = self.current_step as f32 / self.step_count as f32;
        Some(self.from_value + (self.to_value - self.from_value) * t)
    }
}

/// What [`FlipDisplay::render_value`] did with a new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Same formatted readout as the last request. Nothing to do.
    Unchanged,
    /// First render: faces placed directly, no transition.
    Snapped,
    /// Delta too small to step: final faces retargeted in one go.
    Direct,
    /// Stepped interpolation started. Call [`FlipDisplay::step`] every
    /// `interval_ms` until it returns `false`.
    Animating { steps: u32, interval_ms: u32 },
    /// The value could not be formatted. The readout was left as it was.
    Rejected(OdometerError),
}

impl RenderOutcome {
    /// Number of interpolation steps this outcome scheduled.
    #[inline]
    pub const fn steps(&self) -> u32 {
        match self {
            Self::Animating { steps, .. } => *steps,
            _ => 0,
        }
    }
}

// =============================================================================
// Flip Display
// =============================================================================

/// Per-widget odometer state: the slot arena, what it shows, and any
/// in-flight interpolation.
pub struct FlipDisplay {
    format: OdometerFormat,
    unit: String<MAX_UNIT_LEN>,
    duration_ms: u32,

    slots: Vec<DigitSlot, MAX_SLOTS>,
    next_id: u32,

    /// Readout currently on the slots, and the value it was formatted from.
    rendered: Option<(Readout, f32)>,

    /// Latest requested readout. Equal to `rendered` when idle.
    target: Option<Readout>,

    animation: Option<OdometerAnimation>,
    rebuilds: u32,
}

impl FlipDisplay {
    /// Create an empty display. Nothing is shown until the first render.
    ///
    /// Units longer than [`MAX_UNIT_LEN`] bytes are truncated at a char boundary.
    pub fn new(
        format: OdometerFormat,
        unit: &str,
        duration_ms: u32,
    ) -> Self {
        let mut label: String<MAX_UNIT_LEN> = String::new();
        for c in unit.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self {
            format,
            unit: label,
            duration_ms,
            slots: Vec::new(),
            next_id: 0,
            rendered: None,
            target: None,
            animation: None,
            rebuilds: 0,
        }
    }

    #[inline]
    pub const fn format(&self) -> &OdometerFormat { &self.format }

    #[inline]
    pub fn unit(&self) -> &str { &self.unit }

    #[inline]
    pub fn slots(&self) -> &[DigitSlot] { &self.slots }

    /// The readout currently shown, if anything was rendered.
    #[inline]
    pub fn readout(&self) -> Option<&str> { self.rendered.as_ref().map(|(r, _)| r.as_str()) }

    /// The value the shown readout was formatted from.
    #[inline]
    pub fn rendered_value(&self) -> Option<f32> { self.rendered.as_ref().map(|(_, v)| *v) }

    #[inline]
    pub const fn animation(&self) -> Option<&OdometerAnimation> { self.animation.as_ref() }

    #[inline]
    pub const fn is_animating(&self) -> bool { self.animation.is_some() }

    /// Number of times the slot set was torn down and rebuilt.
    #[inline]
    pub const fn rebuild_count(&self) -> u32 { self.rebuilds }

    /// Swap in a new format (e.g. widened bounds). The next render rebuilds
    /// the slots if the readout shape changed.
    pub fn set_format(
        &mut self,
        format: OdometerFormat,
    ) {
        if self.format != format {
            self.format = format;
            self.target = None;
        }
    }

    /// Show `value`, animating from whatever is on the slots now.
    ///
    /// An in-flight interpolation is cancelled; the new one starts from the
    /// last rendered value, not the cancelled target.
    pub fn render_value(
        &mut self,
        value: f32,
    ) -> RenderOutcome {
        let readout = match self.format.format(value) {
            Ok(readout) => readout,
            Err(err) => return RenderOutcome::Rejected(err),
        };

        if self.target.as_ref() == Some(&readout) {
            return RenderOutcome::Unchanged;
        }
        self.target = Some(readout.clone());

        if self.animation.take().is_some() {
            log::trace!("odometer: superseding in-flight animation");
        }

        let Some(from) = self.rendered_value() else {
            self.apply(&readout, value);
            return RenderOutcome::Snapped;
        };

        let animation = OdometerAnimation::new(from, value);
        if animation.step_count() <= 1 {
            self.apply(&readout, value);
            return RenderOutcome::Direct;
        }

        let steps = animation.step_count();
        let interval_ms = animation.interval_ms(self.duration_ms);
        log::debug!("odometer: {from} -> {value} in {steps} steps every {interval_ms}ms");
        self.animation = Some(animation);
        RenderOutcome::Animating { steps, interval_ms }
    }

    /// Render the next interpolation step. Returns `true` while more remain.
    pub fn step(&mut self) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let Some(value) = animation.next_value() else {
            self.animation = None;
            return false;
        };
        let finished = animation.is_finished();

        if let Ok(readout) = self.format.format(value) {
            self.apply(&readout, value);
        }

        if finished {
            self.animation = None;
        }
        !finished
    }

    /// Drop any in-flight interpolation, leaving the current faces in place.
    pub fn cancel(&mut self) {
        if self.animation.take().is_some() {
            self.target = self.rendered.as_ref().map(|(r, _)| r.clone());
        }
    }

    fn apply(
        &mut self,
        readout: &Readout,
        value: f32,
    ) {
        let kinds = slot_kinds(readout, self.format.signed, !self.unit.is_empty());
        let same_shape = kinds.len() == self.slots.len() && kinds.iter().zip(self.slots.iter()).all(|(k, s)| *k == s.kind);

        if same_shape {
            for (slot, face) in self.slots.iter_mut().zip(readout.chars()) {
                slot.retarget(face);
            }
        } else {
            self.rebuild(readout, &kinds);
        }

        self.rendered = Some((readout.clone(), value));
    }

    fn rebuild(
        &mut self,
        readout: &str,
        kinds: &[SlotKind],
    ) {
        if !self.slots.is_empty() {
            log::debug!("odometer: readout shape changed ({} -> {} slots), rebuilding", self.slots.len(), kinds.len());
        }
        self.slots.clear();
        let mut faces = readout.chars();
        for kind in kinds {
            let face = if *kind == SlotKind::Unit { ' ' } else { faces.next().unwrap_or(' ') };
            let slot = DigitSlot {
                id: SlotId(self.next_id),
                kind: *kind,
                face,
                previous_face: None,
            };
            self.next_id = self.next_id.wrapping_add(1);
            self.slots.push(slot).ok();
        }
        self.rebuilds += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================
