// ==========================================
// 补货需求引擎 - 引擎层错误类型
// ==========================================
// 每个变体对应状态机中失败所在的步骤
// ==========================================

use crate::domain::types::RunState;
use crate::output::OutputError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("主数据加载失败: {0}")]
    MasterData(#[source] RepositoryError),

    #[error("事实数据聚合失败: {0}")]
    FactStore(#[source] RepositoryError),

    #[error("批次输出失败: {0}")]
    Output(#[from] OutputError),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: RunState, to: RunState },
}

impl EngineError {
    /// 失败发生时所处的状态
    pub fn failed_state(&self) -> RunState {
        match self {
            EngineError::MasterData(_) => RunState::LoadingMasterData,
            EngineError::FactStore(_) => RunState::AggregatingFacts,
            EngineError::Output(_) => RunState::Writing,
            EngineError::InvalidStateTransition { from, .. } => *from,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
