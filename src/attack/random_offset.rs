use std::f64::consts::TAU;

use crate::attack::{compute_new_heading, AttackMode, ATTACK_RNG_STREAM};
use crate::models::{common::math_utils, SafetyBeacon};
use crate::rng::SimRng;

/// 一様乱数オフセット摂動戦略
///
/// ビーコンの真のヘディング／ヨーレートに、[-offset, +offset]の
/// 一様乱数オフセットを加えて摂動します。オフセット幅が[-2π, 2π]の
/// 範囲外に設定されている場合、attackはビーコンを一切変更せずに
/// 戻ります（設定異常に対する無音のクランプであり、エラーではありません）。
#[derive(Debug, Clone)]
pub struct RandomOffsetSpoofer {
    /// 改ざん対象フィールドの選択（インスタンスごとに固定）
    mode: AttackMode,
    /// 摂動区間の半幅（ラジアン）
    offset: f64,
    /// 直前ビーコン時点の真のヘディング（ラジアン）
    prev_heading: f64,
    /// 直前ビーコンの送信時刻（秒）
    prev_beacon_time: f64,
}

impl RandomOffsetSpoofer {
    /// 新しい戦略インスタンスを作成します
    ///
    /// # 引数
    ///
    /// * `mode` - 攻撃モード
    pub fn new(mode: AttackMode) -> Self {
        Self {
            mode,
            offset: 0.0,
            prev_heading: 0.0,
            prev_beacon_time: 0.0,
        }
    }

    /// オフセット幅と直前ビーコン時点の真の状態を記録
    ///
    /// 検証は行わず、無条件に上書きします。
    ///
    /// # 引数
    ///
    /// * `offset` - 摂動区間の半幅（ラジアン）
    /// * `prev_heading` - 直前ビーコン時点の真のヘディング（ラジアン）
    /// * `prev_beacon_time` - 直前ビーコンの送信時刻（秒）
    pub fn update(&mut self, offset: f64, prev_heading: f64, prev_beacon_time: f64) {
        self.offset = offset;
        self.prev_heading = prev_heading;
        self.prev_beacon_time = prev_beacon_time;
    }

    /// 送信ビーコンをその場で改ざん
    ///
    /// 成功した呼び出しごとに乱数を1回だけ消費します
    /// （オフセット幅が範囲外の場合は消費しません）。
    ///
    /// # 引数
    ///
    /// * `beacon` - 改ざん対象の送信ビーコン
    /// * `current_time` - 現在のシミュレーション時刻（秒）
    /// * `rng` - シミュレーションの乱数源
    pub fn attack(&self, beacon: &mut SafetyBeacon, current_time: f64, rng: &mut SimRng) {
        if self.offset > TAU || self.offset < -TAU {
            return;
        }

        let delta = rng.uniform(ATTACK_RNG_STREAM, -self.offset, self.offset);

        match self.mode {
            AttackMode::Heading => {
                beacon.set_attack_type("RandomHeadingOffset");
                // ビーコン自身が持つ現在の真のヘディングに摂動を加える
                beacon.set_heading(math_utils::normalize_heading(beacon.heading() + delta));
            }
            AttackMode::YawRate => {
                beacon.set_attack_type("RandomYawRateOffset");
                // ヨーレートにも2πの剰余を適用する（Bothモードとは非対称）
                beacon.set_yaw_rate((beacon.yaw_rate() + delta) % TAU);
            }
            AttackMode::Both => {
                beacon.set_attack_type("RandomHeadingYawRateOffset");
                // こちらの分岐では剰余を適用しない
                let new_yaw_rate = beacon.yaw_rate() + delta;
                beacon.set_yaw_rate(new_yaw_rate);

                let new_heading = compute_new_heading(
                    self.prev_heading,
                    new_yaw_rate,
                    self.prev_beacon_time,
                    current_time,
                );
                beacon.set_heading(new_heading);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Position2D;

    fn make_beacon() -> SafetyBeacon {
        SafetyBeacon::new(
            "V001".to_string(),
            1.0,
            Position2D::new(0.0, 0.0),
            13.9,
            3.0,
            0.05,
        )
    }

    fn assert_untouched(beacon: &SafetyBeacon) {
        assert_eq!(beacon.heading(), 3.0);
        assert_eq!(beacon.yaw_rate(), 0.05);
        assert_eq!(beacon.attack_type(), None);
    }

    #[test]
    fn test_out_of_range_offset_is_noop_in_all_modes() {
        for mode in [AttackMode::Heading, AttackMode::YawRate, AttackMode::Both] {
            let mut rng = SimRng::new(42, 1);
            let mut spoofer = RandomOffsetSpoofer::new(mode);
            spoofer.update(7.0, 1.0, 0.0);
            let mut beacon = make_beacon();
            spoofer.attack(&mut beacon, 1.0, &mut rng);
            assert_untouched(&beacon);

            spoofer.update(-7.0, 1.0, 0.0);
            spoofer.attack(&mut beacon, 1.0, &mut rng);
            assert_untouched(&beacon);
        }
    }

    #[test]
    fn test_noop_consumes_no_random_draw() {
        let mut rng = SimRng::new(42, 1);
        let mut reference = SimRng::new(42, 1);

        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::Heading);
        spoofer.update(7.0, 1.0, 0.0);
        let mut beacon = make_beacon();
        spoofer.attack(&mut beacon, 1.0, &mut rng);

        // クランプされた呼び出しの後も乱数列は消費されていない
        assert_eq!(rng.uniform(0, 0.0, 1.0), reference.uniform(0, 0.0, 1.0));
    }

    #[test]
    fn test_heading_mode_perturbs_within_bounds() {
        let mut rng = SimRng::new(42, 1);
        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::Heading);
        spoofer.update(0.1, 1.0, 0.0);

        for _ in 0..500 {
            let mut beacon = make_beacon();
            spoofer.attack(&mut beacon, 1.0, &mut rng);
            assert_eq!(beacon.attack_type(), Some("RandomHeadingOffset"));
            // 3.0±0.1は正規化の折り返しをまたがない
            assert!((2.9..3.1).contains(&beacon.heading()), "heading = {}", beacon.heading());
        }
    }

    #[test]
    fn test_yaw_rate_mode_applies_modulus() {
        let mut rng = SimRng::new(42, 1);
        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::YawRate);
        spoofer.update(0.0, 1.0, 0.0);
        let mut beacon = SafetyBeacon::new(
            "V001".to_string(),
            1.0,
            Position2D::new(0.0, 0.0),
            13.9,
            3.0,
            7.0, // 2πを超えるヨーレート
        );
        spoofer.attack(&mut beacon, 1.0, &mut rng);
        assert_eq!(beacon.attack_type(), Some("RandomYawRateOffset"));
        assert!((beacon.yaw_rate() - 7.0_f64.rem_euclid(TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_both_mode_zero_offset_is_deterministic() {
        let mut rng = SimRng::new(42, 1);
        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::Both);
        spoofer.update(0.0, 1.0, 0.0);
        let mut beacon = make_beacon();
        let original_yaw_rate = beacon.yaw_rate();

        spoofer.attack(&mut beacon, 1.0, &mut rng);

        // offset=0ではδ=0が決定論的に得られる
        assert_eq!(beacon.yaw_rate(), original_yaw_rate);
        let expected = compute_new_heading(1.0, original_yaw_rate, 0.0, 1.0);
        assert_eq!(beacon.heading(), expected);
        assert_eq!(beacon.attack_type(), Some("RandomHeadingYawRateOffset"));
    }

    #[test]
    fn test_both_mode_has_no_modulus() {
        let mut rng = SimRng::new(42, 1);
        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::Both);
        spoofer.update(0.0, 1.0, 0.0);
        let mut beacon = SafetyBeacon::new(
            "V001".to_string(),
            1.0,
            Position2D::new(0.0, 0.0),
            13.9,
            3.0,
            7.0, // 2πを超えるヨーレート
        );
        spoofer.attack(&mut beacon, 1.0, &mut rng);
        // YawRateモードと異なり剰余は適用されない
        assert_eq!(beacon.yaw_rate(), 7.0);
    }

    #[test]
    fn test_boundary_offset_is_accepted() {
        let mut rng = SimRng::new(42, 1);
        let mut spoofer = RandomOffsetSpoofer::new(AttackMode::Heading);
        spoofer.update(TAU, 1.0, 0.0);
        let mut beacon = make_beacon();
        spoofer.attack(&mut beacon, 1.0, &mut rng);
        // ちょうど2πは範囲内として扱われ、改ざんが行われる
        assert_eq!(beacon.attack_type(), Some("RandomHeadingOffset"));
        assert!((0.0..TAU).contains(&beacon.heading()));
    }
}
