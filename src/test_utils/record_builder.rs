use crate::LogRecord;
use crate::LogType;

/// Hands out consecutive log records of one term.
pub struct LogRecordBuilder {
    index: u64,
    term: u64,
}

impl LogRecordBuilder {
    pub fn new(
        start_index: u64,
        term: u64,
    ) -> Self {
        Self {
            index: start_index,
            term,
        }
    }

    pub fn command(
        mut self,
        data: &[u8],
    ) -> (Self, LogRecord) {
        let record = LogRecord::command(self.index, self.term, data.to_vec());
        self.index += 1;
        (self, record)
    }

    pub fn config(
        mut self,
        members: &[u8],
    ) -> (Self, LogRecord) {
        let record = LogRecord::configuration(self.index, self.term, members.to_vec());
        self.index += 1;
        (self, record)
    }

    pub fn noop(mut self) -> (Self, LogRecord) {
        let record = LogRecord::noop(self.index, self.term);
        self.index += 1;
        (self, record)
    }

    pub fn barrier(mut self) -> (Self, LogRecord) {
        let record = LogRecord {
            index: self.index,
            term: self.term,
            log_type: LogType::Barrier,
            ..Default::default()
        };
        self.index += 1;
        (self, record)
    }
}
