use std::{fs, io::Seek};

use log::info;
use pixelpush_core::{
    Error, Result,
    fs::{File, Filesystem, Mode},
};

pub struct StdFilesystem {
    base_path: std::path::PathBuf,
}

impl StdFilesystem {
    pub fn new_with_base_path(base_path: std::path::PathBuf) -> Self {
        info!("Using StdFilesystem with base path: {:?}", base_path);
        StdFilesystem { base_path }
    }
}

fn io_error(error: std::io::Error) -> Error {
    match error.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound,
        _ => Error::from_io_error(error),
    }
}

impl Filesystem for StdFilesystem {
    type File = StdFile;

    fn open_file(&self, path: &str, mode: Mode) -> Result<StdFile> {
        let path = self.base_path.join(path);
        let options = match mode {
            Mode::Read => fs::OpenOptions::new().read(true).clone(),
            Mode::Write => fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .clone(),
        };
        let file = options.open(path).map_err(io_error)?;
        StdFile::new(file).map_err(io_error)
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.base_path.join(path).exists())
    }
}

pub struct StdFile {
    file: std::io::BufReader<std::fs::File>,
    size: usize,
}

impl StdFile {
    pub fn new(mut file: std::fs::File) -> std::io::Result<Self> {
        let size = file.seek(std::io::SeekFrom::End(0))? as usize;
        file.seek(std::io::SeekFrom::Start(0))?;
        Ok(StdFile {
            file: std::io::BufReader::new(file),
            size,
        })
    }
}

impl File for StdFile {
    fn size(&self) -> usize {
        self.size
    }
}

impl embedded_io::ErrorType for StdFile {
    type Error = std::io::Error;
}

impl embedded_io::Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        use std::io::Read;
        self.file.read(buf)
    }
}

impl embedded_io::Write for StdFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        use std::io::Write;
        self.file.get_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        use std::io::Write;
        self.file.get_mut().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelpush_core::{FrameBuffer, PixelFormat, raw};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pixelpush-{}-{}", name, std::process::id()));
        fs::create_dir_all(dir.join(raw::IMAGE_DIR)).unwrap();
        dir
    }

    #[test]
    fn loads_dump_from_disk() {
        let dir = scratch_dir("load");
        fs::write(dir.join("images/test.r565"), vec![0xa5u8; 40_960]).unwrap();
        fs::write(dir.join("images/short.r565"), vec![0xa5u8; 40_959]).unwrap();
        let storage = StdFilesystem::new_with_base_path(dir.clone());

        let mut buffer = vec![0u8; 40_960];
        let mut frame =
            FrameBuffer::new(&mut buffer, 160, 128, 160, PixelFormat::Rgb565, None).unwrap();
        assert!(storage.exists("images/test.r565").unwrap());
        raw::load(&storage, "images/test.r565", &mut frame).unwrap();
        assert!(frame.as_bytes().iter().all(|b| *b == 0xa5));
        assert_eq!(
            raw::load(&storage, "images/short.r565", &mut frame),
            Err(Error::ShortRead {
                expected: 40_960,
                actual: 40_959
            })
        );
        assert_eq!(
            raw::load(&storage, "images/none.r565", &mut frame),
            Err(Error::NotFound)
        );
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn stores_dump_to_disk() {
        let dir = scratch_dir("store");
        let storage = StdFilesystem::new_with_base_path(dir.clone());
        let mut buffer = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let frame = FrameBuffer::new(&mut buffer, 2, 2, 2, PixelFormat::Rgb565, None).unwrap();
        let mut out = storage.open_file("images/out.r565", Mode::Write).unwrap();
        raw::store(&mut out, &frame).unwrap();
        drop(out);
        assert_eq!(fs::read(dir.join("images/out.r565")).unwrap(), buffer);
        fs::remove_dir_all(dir).ok();
    }
}
