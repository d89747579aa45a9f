//! # Attack モジュール
//!
//! 送信ビーコンのヘディング／ヨーレートを改ざんする攻撃戦略を提供します。
//!
//! 攻撃車両は自身の真の運動状態からビーコンを生成した後、ここで定義される
//! 戦略によって選択フィールドを偽値に書き換えてからブロードキャストします。
//!
//! ## 主要機能
//!
//! - **HighSpoofer**: 固定の極端なヨーレート値への置き換え
//! - **RandomOffsetSpoofer**: 一様乱数オフセットによる摂動
//! - **ヘディング積分**: ヨーレートと経過時間から整合的な新ヘディングを導出
//!
//! ## 呼び出し順序
//!
//! ビーコン送信ごとに、呼び出し側はまずupdateで直前ビーコン時点の
//! 真のヘディングと送信時刻を渡し、続いてattackで送信ビーコンを
//! その場で書き換えます。

pub mod high;
pub mod random_offset;

pub use high::HighSpoofer;
pub use random_offset::RandomOffsetSpoofer;

use crate::models::{common::math_utils, SafetyBeacon};
use crate::rng::SimRng;

/// 攻撃で使用する乱数ストリーム番号
pub const ATTACK_RNG_STREAM: usize = 0;

/// 攻撃モード
///
/// ビーコンのどのフィールドを改ざんするかを選択します。
/// 戦略インスタンスごとに固定で、シナリオ設定から与えられます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// ヘディングのみ改ざん
    Heading,
    /// ヨーレートのみ改ざん
    YawRate,
    /// ヘディングとヨーレートの両方を改ざん
    Both,
}

/// 直前のヘディングにヨーレートによる変化量を積分して新しいヘディングを計算
///
/// `prev_heading + yaw_rate * (current_time - prev_time)`を[0, 2π)に
/// 正規化して返します。入力の検証は行わず、NaN/Infinityは結果に
/// そのまま伝播します。
///
/// # 引数
///
/// * `prev_heading` - 直前のヘディング（ラジアン、正規化不要）
/// * `yaw_rate` - ヨーレート（rad/s、符号付き）
/// * `prev_time` - 直前ビーコンの送信時刻（秒）
/// * `current_time` - 現在のシミュレーション時刻（秒）
///
/// # 戻り値
///
/// [0, 2π)に正規化された新しいヘディング（ラジアン）
pub fn compute_new_heading(prev_heading: f64, yaw_rate: f64, prev_time: f64, current_time: f64) -> f64 {
    let elapsed = current_time - prev_time;
    math_utils::normalize_heading(prev_heading + yaw_rate * elapsed)
}

/// 攻撃戦略
///
/// 戦略ごとの状態を持つタグ付きバリアントです。updateの引数形状が
/// 戦略間で異なるため、状態の供給は呼び出し側で各バリアントに
/// マッチして行います。
#[derive(Debug, Clone)]
pub enum SpoofStrategy {
    /// 固定の極端なヨーレートへの置き換え
    High(HighSpoofer),
    /// 一様乱数オフセットによる摂動
    RandomOffset(RandomOffsetSpoofer),
}

impl SpoofStrategy {
    /// 送信ビーコンをその場で改ざん
    ///
    /// # 引数
    ///
    /// * `beacon` - 改ざん対象の送信ビーコン
    /// * `current_time` - 現在のシミュレーション時刻（秒）
    /// * `rng` - シミュレーションの乱数源
    pub fn attack(&self, beacon: &mut SafetyBeacon, current_time: f64, rng: &mut SimRng) {
        match self {
            SpoofStrategy::High(spoofer) => spoofer.attack(beacon, current_time),
            SpoofStrategy::RandomOffset(spoofer) => spoofer.attack(beacon, current_time, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_result_is_normalized() {
        let cases = [
            (0.0, 0.0, 0.0, 0.0),
            (3.0, 5.71892036, 0.0, 1.0),
            (-10.0, 2.0, 1.0, 4.0),
            (100.0, -3.0, 0.0, 10.0),
        ];
        for &(h, y, t0, t1) in &cases {
            let result = compute_new_heading(h, y, t0, t1);
            assert!((0.0..TAU).contains(&result), "({}, {}, {}, {}) -> {}", h, y, t0, t1, result);
        }
    }

    #[test]
    fn test_zero_yaw_rate_identity() {
        let result = compute_new_heading(7.0, 0.0, 0.0, 123.0);
        assert!((result - math_utils::normalize_heading(7.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_elapsed_time_identity() {
        let result = compute_new_heading(2.5, 100.0, 5.0, 5.0);
        assert!((result - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_integration_over_one_second() {
        let result = compute_new_heading(1.0, 0.5, 2.0, 3.0);
        assert!((result - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_nan_input_propagates() {
        assert!(compute_new_heading(f64::NAN, 0.0, 0.0, 1.0).is_nan());
        assert!(compute_new_heading(0.0, f64::NAN, 0.0, 1.0).is_nan());
    }
}
