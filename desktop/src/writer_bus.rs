use log::trace;
use pixelpush_core::panel::PanelBus;

/// Panel bus that writes the pixel stream to any writer.
///
/// Commands are only logged, so a dump of a full frame is itself a valid
/// `.r565` file of what the panel would have shown.
pub struct WriterBus<W> {
    writer: W,
    commands: usize,
    bytes: usize,
}

impl<W: std::io::Write> WriterBus<W> {
    pub fn new(writer: W) -> Self {
        WriterBus {
            writer,
            commands: 0,
            bytes: 0,
        }
    }

    pub fn commands(&self) -> usize {
        self.commands
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Pushes out anything the writer still buffers.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: std::io::Write> PanelBus for WriterBus<W> {
    type Error = std::io::Error;

    fn command(&mut self, command: u8, params: &[u8]) -> std::io::Result<()> {
        trace!("bus cmd {:#04x} {:02x?}", command, params);
        self.commands += 1;
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes += bytes.len();
        Ok(())
    }
}
