//! # Rng モジュール
//!
//! シミュレーション用の決定論的乱数源を提供します。
//!
//! 同一シードからは常に同一の乱数列が得られ、ストリーム番号で独立した
//! 乱数列を分離します。シナリオのシード値を固定すれば実行結果全体が
//! 再現可能になります。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ストリーム番号付きの決定論的乱数源
///
/// シナリオのシード値で初期化され、ストリーム番号ごとに独立した
/// ChaCha8乱数列を保持します。
#[derive(Debug, Clone)]
pub struct SimRng {
    streams: Vec<ChaCha8Rng>,
}

impl SimRng {
    /// 新しい乱数源を作成します
    ///
    /// # 引数
    ///
    /// * `seed` - シナリオのシード値
    /// * `num_streams` - 確保するストリーム数（最低1）
    pub fn new(seed: u64, num_streams: usize) -> Self {
        let streams = (0..num_streams.max(1))
            .map(|index| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(index as u64);
                rng
            })
            .collect();
        Self { streams }
    }

    /// 一様乱数を1つ取得
    ///
    /// `low + r * (high - low)`（rは[0, 1)の一様乱数）を返します。
    /// `low == high`の場合はその値をそのまま返し、`low > high`の場合は
    /// 区間が反転した一様乱数になります（どちらもパニックしません）。
    ///
    /// # 引数
    ///
    /// * `stream` - ストリーム番号
    /// * `low` - 区間の下端
    /// * `high` - 区間の上端
    pub fn uniform(&mut self, stream: usize, low: f64, high: f64) -> f64 {
        let r: f64 = self.streams[stream].r#gen();
        low + r * (high - low)
    }
}
