//! Line unfolding -- joins folded continuation lines into logical content lines.
//!
//! A physical line that starts with a single SPACE or HTAB continues the previous
//! logical line: the leading whitespace character is dropped and the remainder is
//! appended verbatim. Carriage returns are stripped. Blank lines are yielded as
//! empty logical lines; consumers skip them.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Split;

/// Lazy iterator over the logical lines of a feed.
///
/// Lines that were not folded are borrowed from the input; only joined lines
/// allocate. Calling [`unfold`] again on the same text yields the same lines.
#[derive(Debug, Clone)]
pub struct Unfold<'a> {
    physical: Peekable<Split<'a, char>>,
}

/// Start unfolding `text`.
pub fn unfold(text: &str) -> Unfold<'_> {
    Unfold {
        physical: text.split('\n').peekable(),
    }
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn strip_cr(line: &str) -> &str {
    line.trim_end_matches('\r')
}

impl<'a> Iterator for Unfold<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.physical.next()?;
        let first = if is_continuation(first) {
            // Continuation with nothing before it becomes a line of its own.
            &first[1..]
        } else {
            first
        };
        let mut line = Cow::Borrowed(strip_cr(first));

        while let Some(next) = self.physical.peek() {
            if !is_continuation(next) {
                break;
            }
            let continuation = strip_cr(&next[1..]);
            line.to_mut().push_str(continuation);
            self.physical.next();
        }

        Some(line)
    }
}
