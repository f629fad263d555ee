//! Selection between the last-value and last-stride predictions.

/// Identifies the predictor providing a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// The last-value table
    LastValue,

    /// The last-stride table
    LastStride,
}
impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::LastValue => write!(f, "LV"),
            Self::LastStride => write!(f, "LS"),
        }
    }
}

/// A candidate prediction from one of the tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub value: u64,
    pub confidence: u8,
}

/// Output from [`Chooser::choose`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    pub source: Source,
    pub value: u64,
    pub confidence: u8,
}

/// Picks one of two candidate predictions.
///
/// Last-value is preferred. Last-stride only wins when its confidence is
/// at least `bias` above the last-value confidence, or when it's the only
/// candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chooser {
    pub bias: u8,
}
impl Chooser {
    pub fn new(bias: u8) -> Self { Self { bias } }

    /// `lv` is present when the last-value table hit. `ls` is present when
    /// the last-stride table hit an entry that has learned a stride.
    pub fn choose(&self, lv: Option<Candidate>, ls: Option<Candidate>)
        -> Option<Choice>
    {
        let lv_conf = lv.map_or(0, |c| c.confidence);
        match (lv, ls) {
            (None, None) => None,
            (_, Some(ls)) if ls.confidence as u16 >= lv_conf as u16 + self.bias as u16 => {
                Some(Choice::new(Source::LastStride, ls))
            },
            (Some(lv), _) => Some(Choice::new(Source::LastValue, lv)),
            (None, Some(ls)) => Some(Choice::new(Source::LastStride, ls)),
        }
    }
}

impl Choice {
    fn new(source: Source, c: Candidate) -> Self {
        Self { source, value: c.value, confidence: c.confidence }
    }
}
