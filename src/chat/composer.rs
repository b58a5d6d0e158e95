/// Input buffer of the message box.
#[derive(Debug, Default)]
pub struct Composer {
    pub input: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the typed text if it is not blank, leaving the buffer empty.
    /// Blank input is left untouched.
    pub fn submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.input))
    }
}
