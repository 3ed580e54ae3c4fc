use rustyline::ExternalPrinter;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct GateState {
    prompt_open: bool,
    printer: Option<Box<dyn ExternalPrinter + Send>>,
}

/// Tracks whether the line editor currently owns the terminal line.
///
/// Output produced while a prompt is open is handed to the editor's external
/// printer so it lands above the prompt instead of through the text being typed.
#[derive(Clone, Default)]
pub struct PromptGate {
    state: Arc<Mutex<GateState>>,
}

impl PromptGate {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn attach<P: ExternalPrinter + Send + 'static>(&self, printer: P) {
        self.lock().printer = Some(Box::new(printer));
    }

    pub fn set_prompt_open(&self, open: bool) {
        self.lock().prompt_open = open;
    }

    fn routes_to_prompt(&self) -> bool {
        let state = self.lock();
        state.prompt_open && state.printer.is_some()
    }

    /// Hand `text` to the editor. Gives it back when no prompt can take it.
    fn print(&self, text: String) -> std::result::Result<(), String> {
        let mut state = self.lock();
        if !state.prompt_open {
            return Err(text);
        }
        match state.printer.as_mut() {
            Some(printer) => printer.print(text.clone()).map_err(|_| text),
            None => Err(text),
        }
    }

    pub fn writer<W: Write>(&self, fallback: W) -> GatedWriter<W> {
        GatedWriter {
            gate: self.clone(),
            fallback,
            pending: Vec::new(),
        }
    }
}

/// Writer that goes straight to `fallback` unless a prompt is open.
pub struct GatedWriter<W> {
    gate: PromptGate,
    fallback: W,
    pending: Vec<u8>,
}

impl<W: Write> Write for GatedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.gate.routes_to_prompt() {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            self.fallback.write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let text = String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned();
            if let Err(text) = self.gate.print(text) {
                self.fallback.write_all(text.as_bytes())?;
            }
        }
        self.fallback.flush()
    }
}
