//! # 后台任务模块
//!
//! 在独立的工作线程上执行一次隐写或恢复操作，并通过通道把结果交回调用方。
//! 调用方既可以轮询 (`try_outcome`)，也可以阻塞等待 (`wait`)。
//! 任务不支持取消，也没有内部超时。

use crate::constants::WORKER_THREAD_NAME;
use crate::steganography::{CharPolicy, decode_file, encode_file};
use anyhow::{Result, anyhow};
use log::debug;
use std::any::Any;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

/// 一次待执行的操作。
#[derive(Debug, Clone)]
pub enum Job {
    Hide {
        image: PathBuf,
        message: String,
        dest: PathBuf,
        policy: CharPolicy,
    },
    Reveal {
        image: PathBuf,
    },
}

/// 操作成功后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// 隐写结果已写入该路径。
    Hidden(PathBuf),
    /// 恢复出的消息；`None` 表示图像中没有找到消息。
    Revealed(Option<String>),
}

impl Job {
    /// 在当前线程上同步执行。
    pub fn run(self) -> Result<JobOutcome> {
        match self {
            Job::Hide {
                image,
                message,
                dest,
                policy,
            } => {
                encode_file(&image, &message, &dest, policy)?;
                Ok(JobOutcome::Hidden(dest))
            }
            Job::Reveal { image } => Ok(JobOutcome::Revealed(decode_file(&image)?)),
        }
    }
}

/// 正在运行的任务。
pub struct JobHandle {
    receiver: Receiver<Result<JobOutcome>>,
    worker: Option<JoinHandle<()>>,
    delivered: bool,
}

/// 在新的工作线程上启动任务。
///
/// # Errors
///
/// 操作系统无法创建线程时返回错误。
pub fn spawn(job: Job) -> Result<JobHandle> {
    let (sender, receiver) = mpsc::channel();
    debug!("Spawning worker for {job:?}");

    let worker = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            // 接收端已被丢弃时结果无人关心
            let _ = sender.send(job.run());
        })?;

    Ok(JobHandle {
        receiver,
        worker: Some(worker),
        delivered: false,
    })
}

impl JobHandle {
    /// 非阻塞地查询结果。任务尚未完成，或结果已经取走时返回 `None`。
    pub fn try_outcome(&mut self) -> Option<Result<JobOutcome>> {
        if self.delivered {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(self.worker_failure()),
        };
        self.delivered = true;
        Some(result)
    }

    /// 阻塞直到任务结束。
    pub fn wait(mut self) -> Result<JobOutcome> {
        if self.delivered {
            return Err(anyhow!("The job outcome has already been taken"));
        }
        match self.receiver.recv() {
            Ok(result) => result,
            Err(_) => Err(self.worker_failure()),
        }
    }

    /// 通道在发送结果前关闭，说明工作线程发生了 panic。
    fn worker_failure(&mut self) -> anyhow::Error {
        match self.worker.take().map(JoinHandle::join) {
            Some(Err(payload)) => anyhow!("Worker thread panicked: {}", panic_message(&*payload)),
            _ => anyhow!("Worker thread exited without reporting a result"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
