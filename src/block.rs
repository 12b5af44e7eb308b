// src/block.rs
//
// Verbatim block tracking. One mode at a time, no nesting: while a block is
// open every line passes through untouched until a delimiter of the same
// family closes it. For generic fences that is any fence run, so `====`
// closes a block opened by `----`. An unterminated block runs to the end of
// the document.

use crate::classify::{self, LineKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockState {
    #[default]
    None,
    /// Opened by a run such as `----` or `====`; closes on any such run.
    Fence,
    OpenBlock,
    Table,
    CommentBlock,
}

impl BlockState {
    pub fn is_active(self) -> bool {
        self != BlockState::None
    }

    /// Mode entered by a toggle line seen outside any block.
    pub fn enter(kind: LineKind) -> Option<Self> {
        match kind {
            LineKind::GenericFence => Some(BlockState::Fence),
            LineKind::OpenBlockFence => Some(BlockState::OpenBlock),
            LineKind::TableFence => Some(BlockState::Table),
            LineKind::CommentBlockFence => Some(BlockState::CommentBlock),
            _ => None,
        }
    }

    /// Would `line` close this block?
    pub fn closes(self, line: &str) -> bool {
        match self {
            BlockState::None => false,
            BlockState::Fence => classify::is_generic_fence(line),
            BlockState::OpenBlock => classify::is_open_block_fence(line),
            BlockState::Table => classify::is_table_fence(line),
            BlockState::CommentBlock => classify::is_comment_block_fence(line),
        }
    }

    /// Advance over a line seen inside the block.
    pub fn step(self, line: &str) -> Self {
        if self.closes(line) {
            BlockState::None
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Context};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn enter(line: &str) -> Option<BlockState> {
        BlockState::enter(classify(line, Context::FRESH))
    }

    #[rstest]
    #[case("----", BlockState::Fence)]
    #[case("....", BlockState::Fence)]
    #[case("--", BlockState::OpenBlock)]
    #[case("|===", BlockState::Table)]
    #[case("////", BlockState::CommentBlock)]
    fn toggles_enter_their_mode(#[case] line: &str, #[case] expected: BlockState) {
        assert_eq!(enter(line), Some(expected));
    }

    #[rstest]
    #[case("Some prose.")]
    #[case("// comment")]
    #[case("* item")]
    #[case("")]
    fn other_lines_enter_nothing(#[case] line: &str) {
        assert_eq!(enter(line), None);
    }

    #[test]
    fn any_fence_run_closes_a_fence() {
        let state = enter("----").unwrap();
        let state = state.step("text inside");
        assert_eq!(state, BlockState::Fence);
        assert_eq!(state.step("===="), BlockState::None);
        assert_eq!(state.step("...."), BlockState::None);
        assert_eq!(state.step("----"), BlockState::None);
    }

    #[test]
    fn other_delimiters_do_not_close_a_fence() {
        let mut state = BlockState::Fence;
        for line in ["--", "|===", "////", "---", "text ----"] {
            state = state.step(line);
            assert_eq!(state, BlockState::Fence, "line {line:?}");
        }
    }

    #[test]
    fn fence_inside_table_does_not_change_mode() {
        let state = BlockState::Table.step("----");
        assert_eq!(state, BlockState::Table);
        assert_eq!(state.step("|==="), BlockState::None);
    }

    #[test]
    fn comment_block_swallows_everything_but_its_fence() {
        let mut state = BlockState::CommentBlock;
        for line in ["// not a comment here", "|===", "----", "* list", ""] {
            state = state.step(line);
            assert_eq!(state, BlockState::CommentBlock);
        }
        assert_eq!(state.step("////"), BlockState::None);
    }

    #[test]
    fn inactive_state_never_closes() {
        assert!(!BlockState::None.closes("----"));
        assert!(!BlockState::None.is_active());
    }
}
