//! 批量提交编排 - 编排层
//!
//! ## 职责
//!
//! 按登记顺序逐个提交文件，汇总每个文件的结果，决定跳转目标。
//!
//! ## 规则
//!
//! - 请求在提交开始时一次性快照，之后对会话的编辑不影响本次提交
//! - 每个请求返回后检查批次代号，模式已切换则整体作废
//! - `FailurePolicy::Abort` 下第一个失败后停止，剩余文件标记为未尝试
//! - 跳转目标只看第一个文件的扩展名
//! - 交接结果按失败策略决定是否接受（见 `SubmissionReport::accepted_handoff`），接受时写回会话

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::FailurePolicy;
use crate::error::{AppError, AppResult, SessionError};
use crate::models::{Destination, Handoff, HandoffItem, HandoffPayload, Mode, UploadedFile};
use crate::services::{TransformRequest, TransformService};
use crate::session::SessionHandle;
use crate::workflow::{FileCtx, SubmitFlow};

/// 提交失败时展示给用户的统一提示
pub const SUBMISSION_ERROR_MESSAGE: &str = "Error processing files";

/// 单个文件的提交结果
#[derive(Debug)]
pub enum OutcomeKind {
    /// 成功；响应里没有可用描述时为 None
    Succeeded(Option<HandoffItem>),
    Failed(AppError),
    /// 前面的文件失败后未再提交
    NotAttempted,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub index: usize,
    pub name: String,
    pub kind: OutcomeKind,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Succeeded(_))
    }
}

/// 一次批量提交的汇总
#[derive(Debug)]
pub struct SubmissionReport {
    pub mode: Mode,
    pub generation: u64,
    pub destination: Destination,
    pub outcomes: Vec<FileOutcome>,
}

impl SubmissionReport {
    /// 每个文件都成功
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.kind, OutcomeKind::Failed(_)))
    }

    pub fn not_attempted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.kind, OutcomeKind::NotAttempted))
            .count()
    }

    /// 有失败时给用户看的提示
    pub fn user_message(&self) -> Option<&'static str> {
        (!self.is_complete()).then_some(SUBMISSION_ERROR_MESSAGE)
    }

    /// 按提交顺序汇总成功的产物
    pub fn handoff(&self) -> Handoff {
        let items = self.outcomes.iter().filter_map(|o| match &o.kind {
            OutcomeKind::Succeeded(item) => item.clone(),
            _ => None,
        });
        Handoff {
            destination: self.destination,
            payload: HandoffPayload::collect(self.mode.uses_keys(), items),
        }
    }

    /// 按失败策略接受交接结果
    ///
    /// - `Abort`：必须全部成功
    /// - `Continue`：至少一个文件成功即可，交接其中成功的部分
    pub fn accepted_handoff(&self, policy: FailurePolicy) -> AppResult<Handoff> {
        let Some(failure) = self.first_failure() else {
            return Ok(self.handoff());
        };
        match policy {
            FailurePolicy::Continue if self.succeeded() > 0 => Ok(self.handoff()),
            _ => Err(failure.into()),
        }
    }

    fn first_failure(&self) -> Option<SessionError> {
        self.outcomes.iter().find_map(|o| match &o.kind {
            OutcomeKind::Failed(e) => Some(SessionError::SubmissionFailed {
                index: o.index,
                name: o.name.clone(),
                reason: e.to_string(),
            }),
            _ => None,
        })
    }
}

/// 批量提交编排器
pub struct SubmissionOrchestrator {
    session: SessionHandle,
    flow: SubmitFlow,
    policy: FailurePolicy,
}

impl SubmissionOrchestrator {
    pub fn new(
        session: SessionHandle,
        service: Arc<dyn TransformService>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            session,
            flow: SubmitFlow::new(service),
            policy,
        }
    }

    /// 提交当前会话中的所有文件
    ///
    /// # 错误
    /// 提交过程中模式被切换时返回 `SessionError::ModeChanged`，本次结果全部丢弃。
    /// 单个文件失败不会让本函数返回错误，而是体现在报告里。
    pub async fn submit(&self) -> AppResult<SubmissionReport> {
        let (mode, generation, batch) = {
            let session = self.session.lock().await;
            let batch: Vec<(UploadedFile, TransformRequest)> = session
                .files()
                .iter()
                .map(|file| (file.clone(), SubmitFlow::build_request(&session, file)))
                .collect();
            (session.mode(), session.generation(), batch)
        };

        let first_extension = batch.first().map(|(file, _)| file.extension.as_str());
        let destination = Destination::for_batch(mode, first_extension);
        info!(
            "📦 开始提交 {} 个文件 (模式: {}, 目标页面: {})",
            batch.len(),
            mode,
            destination.path()
        );

        let mut outcomes = Vec::with_capacity(batch.len());
        let mut aborted = false;

        for (file, request) in &batch {
            if aborted {
                outcomes.push(FileOutcome {
                    index: file.index,
                    name: file.name.clone(),
                    kind: OutcomeKind::NotAttempted,
                });
                continue;
            }

            let ctx = FileCtx::new(file, generation);
            let result = self.flow.run(mode, file, request, &ctx).await;

            let current = self.session.lock().await.generation();
            if current != generation {
                warn!("{} 模式已切换，本次提交作废", ctx);
                return Err(SessionError::ModeChanged {
                    started: generation,
                    current,
                }
                .into());
            }

            let kind = match result {
                Ok(item) => OutcomeKind::Succeeded(item),
                Err(e) => {
                    error!("{} ❌ 提交失败: {}", ctx, e);
                    if self.policy == FailurePolicy::Abort {
                        aborted = true;
                    }
                    OutcomeKind::Failed(e)
                }
            };
            outcomes.push(FileOutcome {
                index: file.index,
                name: file.name.clone(),
                kind,
            });
        }

        let report = SubmissionReport {
            mode,
            generation,
            destination,
            outcomes,
        };

        if let Ok(handoff) = report.accepted_handoff(self.policy) {
            self.session
                .lock()
                .await
                .record_submission(generation, handoff)?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessedFileRecord;
    use crate::services::{TransformEndpoint, TransformResponse, TransformedFile};
    use crate::session::{AnalysisRecord, UploadSession};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// 记录调用的变换服务，按文件名决定成败
    #[derive(Default)]
    struct RecordingTransform {
        calls: Mutex<Vec<(TransformEndpoint, String, String)>>,
        fail_names: Vec<String>,
    }

    #[async_trait]
    impl TransformService for RecordingTransform {
        async fn transform(
            &self,
            endpoint: TransformEndpoint,
            file: &UploadedFile,
            request: &TransformRequest,
        ) -> AppResult<TransformResponse> {
            self.calls.lock().unwrap().push((
                endpoint,
                file.name.clone(),
                request.headers_json().unwrap(),
            ));
            if self.fail_names.contains(&file.name) {
                return Err(AppError::Other("服务端 500".to_string()));
            }
            Ok(TransformResponse {
                filename: Some(format!("masked_{}", file.name)),
                files: Some(vec![TransformedFile {
                    filename: Some(file.name.clone()),
                    encrypted_path: Some(format!("/out/{}.enc", file.name)),
                    decrypted_path: Some(format!("/out/{}.dec", file.name)),
                    ..Default::default()
                }]),
            })
        }
    }

    fn files(names: &[&str]) -> Vec<UploadedFile> {
        names
            .iter()
            .map(|n| UploadedFile::new(*n, b"x".to_vec()))
            .collect()
    }

    fn orchestrator(
        session: &SessionHandle,
        service: Arc<RecordingTransform>,
        policy: FailurePolicy,
    ) -> SubmissionOrchestrator {
        SubmissionOrchestrator::new(session.clone(), service, policy)
    }

    #[tokio::test]
    async fn test_encrypt_submits_each_file_in_order() {
        let session = UploadSession::shared(Mode::Encrypt);
        {
            let mut guard = session.lock().await;
            guard.append(files(&["a.csv", "b.pdf"]));
            guard.keys_mut().set_key(0, "k0").unwrap();
            guard.keys_mut().set_key(1, "k1").unwrap();
        }
        let service = Arc::new(RecordingTransform::default());
        let report = orchestrator(&session, service.clone(), FailurePolicy::Abort)
            .submit()
            .await
            .unwrap();

        let calls = service.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, TransformEndpoint::EncryptFile);
        assert_eq!(calls[0].1, "a.csv");
        assert!(calls[0].2.contains("\"key\":\"k0\""));
        assert_eq!(calls[1].1, "b.pdf");

        assert!(report.is_complete());
        assert_eq!(report.user_message(), None);
        let handoff = report.handoff();
        assert_eq!(handoff.destination, Destination::EncryptedFileViewer);
        let HandoffPayload::Records(records) = &handoff.payload else {
            panic!("加密模式应交接记录");
        };
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/out/a.csv.enc", "/out/b.pdf.enc"]);
        assert!(records.iter().all(|r| r.mode == Mode::Encrypt));

        assert_eq!(session.lock().await.last_handoff(), Some(&handoff));
    }

    #[tokio::test]
    async fn test_destination_follows_first_file_only() {
        let session = UploadSession::shared(Mode::Obfuscate);
        {
            let mut guard = session.lock().await;
            guard.append(files(&["report.pdf", "table.csv"]));
            for _ in 0..2 {
                let (task, _) = guard.begin_next_task().unwrap();
                guard.finish_task(
                    task,
                    Ok(AnalysisRecord::from_columns(vec![
                        "id".to_string(),
                        "email".to_string(),
                    ])),
                );
            }
        }
        let service = Arc::new(RecordingTransform::default());
        let report = orchestrator(&session, service.clone(), FailurePolicy::Abort)
            .submit()
            .await
            .unwrap();

        assert_eq!(report.destination, Destination::DocumentViewer);
        let calls = service.calls.lock().unwrap().clone();
        assert_eq!(calls[0].0, TransformEndpoint::MaskPdf);
        assert_eq!(calls[1].0, TransformEndpoint::MaskCsv);
        assert!(calls[0].2.contains("\"name\":\"email\""));
        assert_eq!(
            report.handoff().payload,
            HandoffPayload::Filenames(vec![
                "masked_report.pdf".to_string(),
                "masked_table.csv".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_abort_stops_after_first_failure() {
        let session = UploadSession::shared(Mode::Decrypt);
        session
            .lock()
            .await
            .append(files(&["a.csv", "b.csv", "c.csv"]));
        let service = Arc::new(RecordingTransform {
            fail_names: vec!["b.csv".to_string()],
            ..Default::default()
        });
        let report = orchestrator(&session, service.clone(), FailurePolicy::Abort)
            .submit()
            .await
            .unwrap();

        let names: Vec<String> = service
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.1.clone())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);

        assert!(!report.is_complete());
        assert_eq!(report.user_message(), Some("Error processing files"));
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.not_attempted(), 1);
        assert!(matches!(report.outcomes[2].kind, OutcomeKind::NotAttempted));
        // 失败的提交不写回会话
        assert!(session.lock().await.last_handoff().is_none());

        let err = report.accepted_handoff(FailurePolicy::Abort).unwrap_err();
        assert!(err.to_string().contains("b.csv"));
    }

    #[tokio::test]
    async fn test_continue_policy_attempts_every_file() {
        let session = UploadSession::shared(Mode::Decrypt);
        session
            .lock()
            .await
            .append(files(&["a.csv", "b.csv", "c.csv"]));
        let service = Arc::new(RecordingTransform {
            fail_names: vec!["b.csv".to_string()],
            ..Default::default()
        });
        let report = orchestrator(&session, service.clone(), FailurePolicy::Continue)
            .submit()
            .await
            .unwrap();

        assert_eq!(service.calls.lock().unwrap().len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.not_attempted(), 0);
        assert_eq!(report.user_message(), Some("Error processing files"));

        // 部分成功：继续策略下接受并写回会话，停止策略下不接受
        assert!(report.accepted_handoff(FailurePolicy::Abort).is_err());
        let accepted = report.accepted_handoff(FailurePolicy::Continue).unwrap();
        assert_eq!(accepted, report.handoff());
        assert_eq!(session.lock().await.last_handoff(), Some(&accepted));

        let HandoffPayload::Records(records) = report.handoff().payload else {
            panic!("解密模式应交接记录");
        };
        assert_eq!(
            records,
            vec![
                ProcessedFileRecord {
                    path: "/out/a.csv.dec".to_string(),
                    filename: "a.csv".to_string(),
                    status: "success".to_string(),
                    length: 1,
                    mode: Mode::Decrypt,
                },
                ProcessedFileRecord {
                    path: "/out/c.csv.dec".to_string(),
                    filename: "c.csv".to_string(),
                    status: "success".to_string(),
                    length: 1,
                    mode: Mode::Decrypt,
                },
            ]
        );
    }

    /// 第一次调用挂起直到测试放行
    struct GatedTransform {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl TransformService for GatedTransform {
        async fn transform(
            &self,
            _endpoint: TransformEndpoint,
            file: &UploadedFile,
            _request: &TransformRequest,
        ) -> AppResult<TransformResponse> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(TransformResponse {
                filename: Some(file.name.clone()),
                files: None,
            })
        }
    }

    #[tokio::test]
    async fn test_continue_policy_with_no_success_is_rejected() {
        let session = UploadSession::shared(Mode::Encrypt);
        session.lock().await.append(files(&["a.csv"]));
        let service = Arc::new(RecordingTransform {
            fail_names: vec!["a.csv".to_string()],
            ..Default::default()
        });
        let report = orchestrator(&session, service, FailurePolicy::Continue)
            .submit()
            .await
            .unwrap();

        assert!(report.accepted_handoff(FailurePolicy::Continue).is_err());
        assert!(session.lock().await.last_handoff().is_none());
    }

    #[tokio::test]
    async fn test_mode_change_mid_submission_discards_results() {
        let session = UploadSession::shared(Mode::Encrypt);
        session.lock().await.append(files(&["a.csv", "b.csv"]));
        let service = Arc::new(GatedTransform {
            started: Notify::new(),
            release: Notify::new(),
        });
        let orchestrator = SubmissionOrchestrator::new(
            session.clone(),
            service.clone(),
            FailurePolicy::Abort,
        );

        let submit = tokio::spawn(async move { orchestrator.submit().await });
        service.started.notified().await;
        session.lock().await.set_mode(Mode::Decrypt);
        service.release.notify_one();

        let err = submit.await.unwrap().unwrap_err();
        assert!(err.is_mode_changed());
        assert!(session.lock().await.last_handoff().is_none());
    }

    #[tokio::test]
    async fn test_empty_session_submits_nothing() {
        let session = UploadSession::shared(Mode::Obfuscate);
        let service = Arc::new(RecordingTransform::default());
        let report = orchestrator(&session, service.clone(), FailurePolicy::Abort)
            .submit()
            .await
            .unwrap();

        assert!(service.calls.lock().unwrap().is_empty());
        assert!(report.outcomes.is_empty());
        assert_eq!(report.destination, Destination::TabularViewer);
        assert!(report.handoff().payload.is_empty());
    }
}
