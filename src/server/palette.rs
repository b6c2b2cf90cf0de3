//! Per-user color assignment over a fixed ANSI palette.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Bold ANSI colors handed out to users in join order: red, green, yellow,
/// blue, magenta, cyan.
pub const PALETTE: [&str; 6] = [
    "\x1b[1;31m",
    "\x1b[1;32m",
    "\x1b[1;33m",
    "\x1b[1;34m",
    "\x1b[1;35m",
    "\x1b[1;36m",
];

/// ANSI escape that resets the terminal color.
pub const RESET_COLOR: &str = "\x1b[0m";

/// Rotation index and name-to-color table, advanced together under one lock
/// so the k-th successful join always receives `PALETTE[k % PALETTE.len()]`,
/// no matter how many joins race.
struct PaletteState {
    next_index: usize,
    assigned: HashMap<String, &'static str>,
}

/// Assigns a display color to each newly joined user, round-robin over
/// [`PALETTE`].
pub struct ColorAssigner {
    state: Mutex<PaletteState>,
}

impl ColorAssigner {
    /// Create an assigner starting at the first palette color.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PaletteState {
                next_index: 0,
                assigned: HashMap::new(),
            }),
        }
    }

    /// Assign the next palette color to `name` and record the mapping.
    ///
    /// The read-pick-advance sequence runs under the lock, so two concurrent
    /// calls can never observe the same pre-increment index. A name that
    /// rejoins gets a fresh assignment, overwriting its previous entry.
    pub async fn assign(&self, name: &str) -> &'static str {
        let mut state = self.state.lock().await;
        let color = PALETTE[state.next_index % PALETTE.len()];
        state.next_index += 1;
        state.assigned.insert(name.to_string(), color);
        color
    }

    /// Look up the color previously assigned to `name`.
    pub async fn lookup(&self, name: &str) -> Option<&'static str> {
        self.state.lock().await.assigned.get(name).copied()
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_assign_rotates_through_palette_in_order() {
        // テスト項目: k 番目の join が PALETTE[k % 6] を受け取る
        // given (前提条件):
        let assigner = ColorAssigner::new();

        // when (操作):
        let mut colors = Vec::new();
        for i in 0..PALETTE.len() {
            colors.push(assigner.assign(&format!("user{}", i)).await);
        }

        // then (期待する結果):
        assert_eq!(colors, PALETTE.to_vec());
    }

    #[tokio::test]
    async fn test_assign_wraps_after_palette_is_exhausted() {
        // テスト項目: パレットを使い切った後、先頭の色に戻る
        // given (前提条件):
        let assigner = ColorAssigner::new();
        for i in 0..PALETTE.len() {
            assigner.assign(&format!("user{}", i)).await;
        }

        // when (操作):
        let color = assigner.assign("wrapped").await;

        // then (期待する結果):
        assert_eq!(color, PALETTE[0]);
    }

    #[tokio::test]
    async fn test_lookup_returns_assigned_color() {
        // テスト項目: assign 済みの名前に対して lookup が同じ色を返す
        // given (前提条件):
        let assigner = ColorAssigner::new();
        let assigned = assigner.assign("alice").await;

        // when (操作):
        let looked_up = assigner.lookup("alice").await;

        // then (期待する結果):
        assert_eq!(looked_up, Some(assigned));
    }

    #[tokio::test]
    async fn test_lookup_returns_none_for_unknown_name() {
        // テスト項目: 未登録の名前に対して lookup が None を返す
        // given (前提条件):
        let assigner = ColorAssigner::new();

        // when (操作):
        let looked_up = assigner.lookup("nobody").await;

        // then (期待する結果):
        assert_eq!(looked_up, None);
    }

    #[tokio::test]
    async fn test_concurrent_assigns_never_share_an_index() {
        // テスト項目: 並行する assign が同じインデックスを観測しない
        // given (前提条件):
        let assigner = Arc::new(ColorAssigner::new());
        let joins = PALETTE.len() + 2;

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..joins {
            let assigner = assigner.clone();
            handles.push(tokio::spawn(async move {
                assigner.assign(&format!("user{}", i)).await
            }));
        }
        let mut colors = Vec::new();
        for handle in handles {
            colors.push(handle.await.unwrap());
        }

        // then (期待する結果):
        // 8 回の join で各色の出現回数は {0,1,...,7} mod 6 の多重集合に一致する
        for (i, expected) in PALETTE.iter().enumerate() {
            let expected_count = if i < joins % PALETTE.len() { 2 } else { 1 };
            let count = colors.iter().filter(|c| **c == *expected).count();
            assert_eq!(count, expected_count, "color {} appeared {} times", i, count);
        }
    }

    #[tokio::test]
    async fn test_rejoining_name_gets_a_fresh_color() {
        // テスト項目: 同名で再 join した場合、新しい色が割り当てられる
        // given (前提条件):
        let assigner = ColorAssigner::new();
        let first = assigner.assign("alice").await;

        // when (操作):
        let second = assigner.assign("alice").await;

        // then (期待する結果):
        assert_eq!(first, PALETTE[0]);
        assert_eq!(second, PALETTE[1]);
        assert_eq!(assigner.lookup("alice").await, Some(PALETTE[1]));
    }
}
