// 基本的なデータ型と数学ユーティリティ
pub mod common;

// エージェントの基本インターフェース（trait）定義
pub mod traits;

// 各モデルの実装
pub mod beacon;
pub mod vehicle;

// 便利な re-export
pub use beacon::SafetyBeacon;
pub use common::*;
pub use traits::*;
pub use vehicle::Vehicle;
