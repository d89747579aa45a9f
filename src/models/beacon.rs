use crate::models::common::Position2D;

/// 安全ビーコンメッセージ
///
/// 車両が周期的にブロードキャストする運動状態メッセージ（BSM/CAM相当）です。
/// 送信車両の位置・速度・ヘディング・ヨーレートのスナップショットを保持し、
/// 攻撃戦略によって改ざんされた場合は攻撃種別ラベルが付与されます。
#[derive(Debug, Clone)]
pub struct SafetyBeacon {
    /// 送信車両のID
    pub sender_id: String,
    /// 送信時刻（シミュレーション開始からの経過秒数）
    pub timestamp: f64,
    /// 送信時点の車両位置
    pub position: Position2D,
    /// 送信時点の速度（m/s）
    pub speed: f64,
    /// ヘディング（ラジアン、[0, 2π)）
    heading: f64,
    /// ヨーレート（rad/s）
    yaw_rate: f64,
    /// 攻撃種別ラベル（真正ビーコンはNone）
    attack_type: Option<String>,
}

impl SafetyBeacon {
    /// 新しいビーコンを作成します
    ///
    /// # 引数
    ///
    /// * `sender_id` - 送信車両のID
    /// * `timestamp` - 送信時刻（秒）
    /// * `position` - 送信時点の車両位置
    /// * `speed` - 速度（m/s）
    /// * `heading` - ヘディング（ラジアン）
    /// * `yaw_rate` - ヨーレート（rad/s）
    pub fn new(
        sender_id: String,
        timestamp: f64,
        position: Position2D,
        speed: f64,
        heading: f64,
        yaw_rate: f64,
    ) -> Self {
        Self {
            sender_id,
            timestamp,
            position,
            speed,
            heading,
            yaw_rate,
            attack_type: None,
        }
    }

    /// 現在のヘディングを取得（ラジアン）
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// 現在のヨーレートを取得（rad/s）
    pub fn yaw_rate(&self) -> f64 {
        self.yaw_rate
    }

    /// 攻撃種別ラベルを取得（真正ビーコンはNone）
    pub fn attack_type(&self) -> Option<&str> {
        self.attack_type.as_deref()
    }

    /// ヘディングを設定（ラジアン）
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = heading;
    }

    /// ヨーレートを設定（rad/s）
    pub fn set_yaw_rate(&mut self, yaw_rate: f64) {
        self.yaw_rate = yaw_rate;
    }

    /// 攻撃種別ラベルを設定
    pub fn set_attack_type(&mut self, attack_type: &str) {
        self.attack_type = Some(attack_type.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_beacon() -> SafetyBeacon {
        SafetyBeacon::new(
            "V001".to_string(),
            1.5,
            Position2D::new(100.0, -50.0),
            13.9,
            1.2,
            0.05,
        )
    }

    #[test]
    fn test_new_beacon_is_genuine() {
        let beacon = make_beacon();
        assert_eq!(beacon.attack_type(), None);
        assert_eq!(beacon.heading(), 1.2);
        assert_eq!(beacon.yaw_rate(), 0.05);
    }

    #[test]
    fn test_setters_overwrite_fields() {
        let mut beacon = make_beacon();
        beacon.set_heading(2.0);
        beacon.set_yaw_rate(-0.3);
        beacon.set_attack_type("HighYawRate");
        assert_eq!(beacon.heading(), 2.0);
        assert_eq!(beacon.yaw_rate(), -0.3);
        assert_eq!(beacon.attack_type(), Some("HighYawRate"));
    }
}
