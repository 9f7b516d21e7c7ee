use std::collections::VecDeque;

/// 一個等待中的 dialog 請求。
pub enum Dialog {
    Alert {
        message: String,
    },
    Confirm {
        title: String,
        detail: String,
        on_accept: Box<dyn FnOnce() + Send>,
    },
}

impl Dialog {
    pub fn message(&self) -> &str {
        match self {
            Dialog::Alert { message } => message,
            Dialog::Confirm { title, .. } => title,
        }
    }
}

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialog::Alert { message } => f.debug_struct("Alert").field("message", message).finish(),
            Dialog::Confirm { title, detail, .. } => f
                .debug_struct("Confirm")
                .field("title", title)
                .field("detail", detail)
                .finish(),
        }
    }
}

/// process 全域的 alert/confirm 擁有者。
/// 同時最多一個 active dialog，其餘依 FIFO 排隊。
pub struct DialogController {
    active: Option<Dialog>,
    queue: VecDeque<Dialog>,
}

impl DialogController {
    pub fn new() -> Self {
        Self {
            active: None,
            queue: VecDeque::new(),
        }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.enqueue(Dialog::Alert {
            message: message.into(),
        });
    }

    pub fn confirm(
        &mut self,
        title: impl Into<String>,
        detail: impl Into<String>,
        on_accept: impl FnOnce() + Send + 'static,
    ) {
        self.enqueue(Dialog::Confirm {
            title: title.into(),
            detail: detail.into(),
            on_accept: Box::new(on_accept),
        });
    }

    fn enqueue(&mut self, dialog: Dialog) {
        if self.active.is_none() {
            self.active = Some(dialog);
        } else {
            self.queue.push_back(dialog);
        }
    }

    pub fn active(&self) -> Option<&Dialog> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 關掉 active dialog（confirm 視為拒絕），下一個排隊請求補上。
    pub fn dismiss(&mut self) -> Option<Dialog> {
        let dismissed = self.active.take();
        self.active = self.queue.pop_front();
        dismissed
    }

    /// 接受 confirm：執行 callback 後補上下一個請求。對 alert 等同 dismiss。
    pub fn accept(&mut self) {
        if let Some(dialog) = self.active.take() {
            if let Dialog::Confirm { on_accept, .. } = dialog {
                on_accept();
            }
        }
        self.active = self.queue.pop_front();
    }
}

impl Default for DialogController {
    fn default() -> Self {
        Self::new()
    }
}
