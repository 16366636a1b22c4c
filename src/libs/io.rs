use crate::libs::phylo::error::TreeError;
use std::io::{BufRead, BufWriter, Cursor, Read, Write};

/// Signature of an xz stream.
pub const XZ_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

fn is_stdin(input: &str) -> bool {
    input == "-" || input == "stdin"
}

fn is_stdout(output: &str) -> bool {
    output == "-" || output == "stdout"
}

/// Whole contents of a file or of stdin (`-`), decompressed when it is
/// an xz stream.
///
/// ```
/// use std::io::BufRead;
/// let reader = tredraw::reader("tests/newick/abc.nwk").unwrap();
/// assert_eq!(reader.lines().count(), 1);
///
/// let reader = tredraw::reader("tests/newick/abc.nwk.xz").unwrap();
/// assert_eq!(reader.lines().count(), 1);
/// ```
pub fn reader(input: &str) -> Result<Box<dyn BufRead>, TreeError> {
    let mut data = Vec::new();
    if is_stdin(input) {
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|e| TreeError::io("cannot read stdin", e))?;
    } else {
        let mut file = std::fs::File::open(input)
            .map_err(|e| TreeError::io(format!("cannot open {}", input), e))?;
        file.read_to_end(&mut data)
            .map_err(|e| TreeError::io(format!("cannot read {}", input), e))?;
    }
    Ok(Box::new(Cursor::new(decompress_if_xz(data)?)))
}

/// Returns `data` unchanged unless it starts with the xz signature.
pub fn decompress_if_xz(data: Vec<u8>) -> Result<Vec<u8>, TreeError> {
    if !data.starts_with(&XZ_MAGIC) {
        return Ok(data);
    }
    let mut decoded = Vec::new();
    xz2::read::XzDecoder::new_multi_decoder(data.as_slice())
        .read_to_end(&mut decoded)
        .map_err(|e| TreeError::Decompression(e.to_string()))?;
    Ok(decoded)
}

/// Buffered writer to a file or to stdout (`-`).
pub fn writer(output: &str) -> Result<Box<dyn Write>, TreeError> {
    let writer: Box<dyn Write> = if is_stdout(output) {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .map_err(|e| TreeError::io(format!("cannot write {}", output), e))?;
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}

/// Writes `text` to a file or stdout; a `.xz` file name compresses it.
pub fn write_text(output: &str, text: &str) -> Result<(), TreeError> {
    let werr = |e: std::io::Error| TreeError::io(format!("cannot write {}", output), e);
    if !is_stdout(output) && output.ends_with(".xz") {
        let file = std::fs::File::create(output).map_err(werr)?;
        let mut encoder = xz2::write::XzEncoder::new(BufWriter::new(file), 9);
        encoder.write_all(text.as_bytes()).map_err(werr)?;
        let mut inner = encoder
            .finish()
            .map_err(|e| TreeError::Decompression(e.to_string()))?;
        inner.flush().map_err(werr)?;
    } else {
        let mut writer = writer(output)?;
        writer.write_all(text.as_bytes()).map_err(werr)?;
        writer.flush().map_err(werr)?;
    }
    Ok(())
}
