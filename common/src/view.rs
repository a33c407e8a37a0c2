use serde::{Deserialize, Serialize};

use crate::models::{BoardSpec, GameState};

/// What a renderer may see of a single cell. An unrevealed mine is
/// indistinguishable from any other hidden cell; `Mine` only appears after
/// a loss has exposed the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum CellView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

/// Full render model of a session, consumed by the presentation layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub spec: BoardSpec,
    pub state: GameState,
    pub flag_mode: bool,
    pub mines_remaining: i32,
    pub grid: Vec<Vec<CellView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_view_serde_tags() {
        let json = serde_json::to_string(&CellView::Revealed { adjacent: 3 }).unwrap();
        assert_eq!(json, r#"{"state":"revealed","adjacent":3}"#);

        let hidden: CellView = serde_json::from_str(r#"{"state":"hidden"}"#).unwrap();
        assert_eq!(hidden, CellView::Hidden);
    }
}
