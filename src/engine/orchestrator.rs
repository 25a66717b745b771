// ==========================================
// 补货需求引擎 - 运行编排器
// ==========================================
// 主流程:
//   LOADING_MASTER_DATA → AGGREGATING_FACTS → COMPUTING_DEMAND
//     → BATCHING → WRITING → DONE
// 任一步骤不可恢复错误 → FAILED，不留部分产物
// 引擎内不重试，重试由外部调度器负责
// ==========================================

use crate::domain::types::RunState;
use crate::engine::aggregator::FactAggregator;
use crate::engine::batcher::SupplierBatcher;
use crate::engine::demand::DemandCalculator;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::report::{BatchSummary, PublishOutcome, RunReport};
use crate::output::{ArtifactTransport, OutputSink, OutputTransaction};
use crate::repository::{FactStore, MasterDataSource};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ==========================================
// RunTracker - 状态机跟踪
// ==========================================
#[derive(Debug, Clone)]
pub struct RunTracker {
    current: RunState,
    visited: Vec<RunState>,
}

impl RunTracker {
    pub fn start() -> Self {
        Self {
            current: RunState::LoadingMasterData,
            visited: vec![RunState::LoadingMasterData],
        }
    }

    pub fn current(&self) -> RunState {
        self.current
    }

    pub fn visited(&self) -> &[RunState] {
        &self.visited
    }

    /// 前进到下一状态（非法转换返回错误）
    pub fn advance(&mut self, to: RunState) -> EngineResult<()> {
        if !self.current.can_transition_to(to) {
            return Err(EngineError::InvalidStateTransition {
                from: self.current,
                to,
            });
        }
        debug!(from = %self.current, to = %to, "状态转换");
        self.current = to;
        self.visited.push(to);
        Ok(())
    }

    /// 转入 FAILED（终态下调用无效果）
    pub fn fail(&mut self) {
        if self.current.can_transition_to(RunState::Failed) {
            self.current = RunState::Failed;
            self.visited.push(RunState::Failed);
        }
    }
}

// ==========================================
// ReplenishmentEngine - 补货需求引擎
// ==========================================
pub struct ReplenishmentEngine<M, F, S>
where
    M: MasterDataSource,
    F: FactStore,
    S: OutputSink,
{
    master: Arc<M>,
    aggregator: FactAggregator<F>,
    calculator: DemandCalculator,
    batcher: SupplierBatcher,
    sink: Arc<S>,
}

impl<M, F, S> ReplenishmentEngine<M, F, S>
where
    M: MasterDataSource,
    F: FactStore,
    S: OutputSink,
{
    /// 创建引擎实例
    ///
    /// # 参数
    /// - master: 主数据源
    /// - facts: 分区事实存储
    /// - sink: 批次输出
    /// - origin_tag: 批次来源标记
    pub fn new(master: Arc<M>, facts: Arc<F>, sink: Arc<S>, origin_tag: impl Into<String>) -> Self {
        Self {
            master,
            aggregator: FactAggregator::new(facts),
            calculator: DemandCalculator::new(),
            batcher: SupplierBatcher::new(origin_tag),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 执行单日完整流程
    ///
    /// # 返回
    /// - Ok(RunReport): 状态 DONE，产物已完整提交
    /// - Err(EngineError): 状态 FAILED，无产物（failed_state() 指出失败步骤）
    pub fn run(&self, date: NaiveDate) -> EngineResult<RunReport> {
        let run_id = Uuid::new_v4();
        let mut report = RunReport::new(run_id, date);
        let mut tracker = RunTracker::start();

        info!(run_id = %run_id, date = %date, "开始补货计算");

        match self.execute(date, &mut tracker, &mut report) {
            Ok(()) => {
                report.states = tracker.visited().to_vec();
                report.finished_at = Some(Utc::now());
                info!(
                    run_id = %run_id,
                    date = %date,
                    batch_count = report.batches.len(),
                    line_count = report.line_count,
                    "补货计算完成"
                );
                Ok(report)
            }
            Err(e) => {
                let failed_at = tracker.current();
                tracker.fail();
                error!(
                    run_id = %run_id,
                    date = %date,
                    state = %failed_at,
                    error = %e,
                    "补货计算失败"
                );
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        date: NaiveDate,
        tracker: &mut RunTracker,
        report: &mut RunReport,
    ) -> EngineResult<()> {
        // ==========================================
        // 步骤1: 加载主数据
        // ==========================================
        let master = self.master.load().map_err(EngineError::MasterData)?;
        report.master_sku_count = master.len();

        // ==========================================
        // 步骤2: 聚合事实数据
        // ==========================================
        tracker.advance(RunState::AggregatingFacts)?;
        let facts = self.aggregator.aggregate(date).map_err(EngineError::FactStore)?;
        report.fact_sku_count = facts.skus().len();
        report.refresh_warnings = facts.refresh_warnings.clone();

        // ==========================================
        // 步骤3: 计算净需求（第一遍，纯计算）
        // ==========================================
        tracker.advance(RunState::ComputingDemand)?;
        let pass = self.calculator.compute_lines(&master, &facts);
        report.skus_without_rule = pass.skus_without_rule;
        report.zero_demand_count = pass.zero_demand_count;
        report.anomalies = pass.anomalies;
        report.line_count = pass.lines.len();

        // ==========================================
        // 步骤4: 按供应商分批（第二遍，单次分组）
        // ==========================================
        tracker.advance(RunState::Batching)?;
        let batches = self.batcher.batch(date, pass.lines);

        // ==========================================
        // 步骤5: 清空并写出
        // ==========================================
        tracker.advance(RunState::Writing)?;
        let mut tx = OutputTransaction::begin(&*self.sink, date, &report.run_id.to_string())?;
        let mut summaries = Vec::with_capacity(batches.len());
        for batch in &batches {
            let location = tx.write(batch)?;
            summaries.push(BatchSummary::from_batch(batch, location));
        }
        tx.commit()?;
        report.batches = summaries;
        report.output_dir = Some(self.sink.area_location(date));

        tracker.advance(RunState::Done)?;
        Ok(())
    }

    /// 执行单日流程并发布产物
    ///
    /// 发布失败只记录在报告中，不改变运行结果
    pub async fn run_and_publish<T>(&self, date: NaiveDate, transport: &T) -> EngineResult<RunReport>
    where
        T: ArtifactTransport + ?Sized,
    {
        let mut report = self.run(date)?;

        let Some(output_dir) = report.output_dir.clone() else {
            report.publish = Some(PublishOutcome::Skipped);
            return Ok(report);
        };

        let remote_target = transport.remote_target_for(date);
        let outcome = match transport.publish(&output_dir, &remote_target).await {
            Ok(receipt) => PublishOutcome::Published {
                remote_target: receipt.remote_target,
                files_copied: receipt.files_copied,
            },
            Err(e) => {
                warn!(
                    date = %date,
                    remote_target = %remote_target,
                    error = %e,
                    "产物发布失败，本地产物有效，可由调用方重试发布"
                );
                PublishOutcome::Failed {
                    remote_target,
                    message: e.to_string(),
                }
            }
        };
        report.publish = Some(outcome);
        Ok(report)
    }
}
