use crate::text::StyledText;

/// Fate of one character of the old text.
///
/// Offsets are signed index deltas from the old position to the matched new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterDiff {
    Same,
    Move(isize),
    MoveAndAdd(isize),
    Replace,
    Add,
    Delete,
}

impl CharacterDiff {
    pub fn offset(self) -> Option<isize> {
        match self {
            Self::Same => Some(0),
            Self::Move(offset) | Self::MoveAndAdd(offset) => Some(offset),
            _ => None,
        }
    }

    /// The new glyph at this index has to be drawn entering.
    pub fn needs_entrance(self) -> bool {
        matches!(
            self,
            Self::MoveAndAdd(_) | Self::Replace | Self::Add | Self::Delete
        )
    }
}

/// Alignment of an old text against a new one.
///
/// `results` is indexed by old position, `skip_drawing` by new position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringDiff {
    pub results: Vec<CharacterDiff>,
    pub skip_drawing: Vec<bool>,
}

impl StringDiff {
    /// Classification seen from new index `j`. Positions past the old text are additions.
    pub fn for_new_index(&self, j: usize) -> CharacterDiff {
        self.results.get(j).copied().unwrap_or(CharacterDiff::Add)
    }

    pub fn skips(&self, j: usize) -> bool {
        self.skip_drawing.get(j).copied().unwrap_or(false)
    }
}

/// Aligns `old` against `new`.
///
/// Old characters are visited left to right; each claims the unclaimed equal
/// character of `new` nearest to its own index, the lower index winning a tie.
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> StringDiff {
    let mut claimed = vec![false; new.len()];
    let mut skip_drawing = vec![false; new.len()];
    let mut results = Vec::with_capacity(old.len());

    for (i, ch) in old.iter().enumerate() {
        let matched = nearest_unclaimed(i, ch, new, &claimed);
        let in_new_range = i < new.len();

        let result = match matched {
            Some(j) => {
                claimed[j] = true;

                if j == i {
                    CharacterDiff::Same
                } else {
                    skip_drawing[j] = true;
                    let offset = j as isize - i as isize;

                    if in_new_range {
                        CharacterDiff::MoveAndAdd(offset)
                    } else {
                        CharacterDiff::Move(offset)
                    }
                }
            }

            None if in_new_range => CharacterDiff::Replace,
            None => CharacterDiff::Delete,
        };

        results.push(result);
    }

    StringDiff {
        results,
        skip_drawing,
    }
}

/// Compares grapheme symbols only; style changes animate as `Same`.
pub fn diff_text(old: &StyledText, new: &StyledText) -> StringDiff {
    diff(&old.symbols(), &new.symbols())
}

fn nearest_unclaimed<T: PartialEq>(i: usize, ch: &T, new: &[T], claimed: &[bool]) -> Option<usize> {
    new.iter()
        .enumerate()
        .filter(|&(j, candidate)| !claimed[j] && candidate == ch)
        .min_by_key(|&(j, _)| (j.abs_diff(i), j))
        .map(|(j, _)| j)
}
