use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

#[cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, Ordering};

/// Element data read from disk, held in 8-byte words so any supported
/// element width can be reinterpreted in place.
#[derive(Clone)]
pub struct WordBuffer {
    words: Vec<u64>,
    len: usize,
}

impl WordBuffer {
    /// Length in bytes of the data actually read.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..self.len]
    }
}

/// Capacity of the output writer.
const OUTPUT_BUF_SIZE: usize = 4 * 1024 * 1024;

/// Cleared after the first EPERM so later opens skip O_NOATIME.
#[cfg(target_os = "linux")]
static NOATIME_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Open `path` for reading, with O_NOATIME when the kernel allows it.
#[cfg(target_os = "linux")]
fn open_noatime(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if !NOATIME_SUPPORTED.load(Ordering::Relaxed) {
        return File::open(path);
    }
    let opened = fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NOATIME)
        .open(path);
    match opened {
        Err(e) if e.raw_os_error() == Some(libc::EPERM) => {
            NOATIME_SUPPORTED.store(false, Ordering::Relaxed);
            File::open(path)
        }
        other => other,
    }
}

#[cfg(not(target_os = "linux"))]
fn open_noatime(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Read a whole file into an 8-byte aligned buffer.
///
/// Regular files are sized from their metadata; anything else is drained
/// with `read_to_end` and copied over.
pub fn read_words(path: &Path) -> io::Result<WordBuffer> {
    let file = open_noatime(path)?;
    let metadata = file.metadata()?;
    let size = metadata.len() as usize;

    if size > 0 && metadata.file_type().is_file() {
        let mut words = vec![0u64; size.div_ceil(8)];
        let bytes = &mut bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..size];
        let n = read_full(&mut &file, bytes)?;
        return Ok(WordBuffer { words, len: n });
    }

    let mut raw = Vec::new();
    let mut reader = file;
    reader.read_to_end(&mut raw)?;
    let mut words = vec![0u64; raw.len().div_ceil(8)];
    bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..raw.len()].copy_from_slice(&raw);
    Ok(WordBuffer {
        words,
        len: raw.len(),
    })
}

/// Write `data` to `path`, replacing any existing file.
pub fn write_bytes(path: &Path, data: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(OUTPUT_BUF_SIZE, file);
    writer.write_all(data)?;
    writer.flush()
}

/// Fill `buf` until it is full or the reader hits EOF; returns bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
