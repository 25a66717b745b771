// ==========================================
// 补货需求引擎 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运行状态 (Run State)
// ==========================================
// 单次运行状态机:
// LOADING_MASTER_DATA → AGGREGATING_FACTS → COMPUTING_DEMAND
//   → BATCHING → WRITING → DONE
// 任一步骤不可恢复错误 → FAILED (终态)
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    LoadingMasterData, // 加载主数据
    AggregatingFacts,  // 聚合事实数据
    ComputingDemand,   // 计算净需求
    Batching,          // 按供应商分批
    Writing,           // 写出批次文件
    Done,              // 完成
    Failed,            // 失败
}

impl RunState {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::LoadingMasterData => "LOADING_MASTER_DATA",
            RunState::AggregatingFacts => "AGGREGATING_FACTS",
            RunState::ComputingDemand => "COMPUTING_DEMAND",
            RunState::Batching => "BATCHING",
            RunState::Writing => "WRITING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    /// 正常流程中的下一个状态（终态返回 None）
    pub fn next(&self) -> Option<RunState> {
        match self {
            RunState::LoadingMasterData => Some(RunState::AggregatingFacts),
            RunState::AggregatingFacts => Some(RunState::ComputingDemand),
            RunState::ComputingDemand => Some(RunState::Batching),
            RunState::Batching => Some(RunState::Writing),
            RunState::Writing => Some(RunState::Done),
            RunState::Done | RunState::Failed => None,
        }
    }

    /// 判断状态转换是否合法
    ///
    /// # 规则
    /// - 非终态只能前进到 next()
    /// - 非终态可随时转入 FAILED
    /// - 终态不可再转换
    pub fn can_transition_to(&self, to: RunState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == RunState::Failed || self.next() == Some(to)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
