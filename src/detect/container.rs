#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Mp4,
    Matroska, // MKV/WebM
    Ogg,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Unknown,
}

/// Detect a video container from the first bytes of the file.
pub fn detect_container(header: &[u8]) -> ContainerFormat {
    // MP4/MOV: bytes 4..8 == "ftyp"
    if header.len() >= 8 && &header[4..8] == b"ftyp" {
        return ContainerFormat::Mp4;
    }

    // MKV/WebM: EBML magic bytes at offset 0
    if header.len() >= 4 && header[0..4] == [0x1A, 0x45, 0xDF, 0xA3] {
        return ContainerFormat::Matroska;
    }

    if header.starts_with(b"OggS") {
        return ContainerFormat::Ogg;
    }

    ContainerFormat::Unknown
}

/// Detect an image format from its signature bytes.
pub fn detect_image(header: &[u8]) -> ImageFormat {
    if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return ImageFormat::Png;
    }
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return ImageFormat::Jpeg;
    }
    if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
        return ImageFormat::Gif;
    }
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return ImageFormat::WebP;
    }
    ImageFormat::Unknown
}

/// Scan top-level MP4 atoms for the moov box within `header`.
/// Returns (offset, size) if found.
pub fn find_moov_box(header: &[u8]) -> Option<(u64, u64)> {
    let len = header.len() as u64;
    let mut offset: u64 = 0;

    while offset + 8 <= len {
        let pos = offset as usize;
        let size32 = u32::from_be_bytes([
            header[pos],
            header[pos + 1],
            header[pos + 2],
            header[pos + 3],
        ]) as u64;
        let atom_type = &header[pos + 4..pos + 8];

        let atom_size = match size32 {
            // 64-bit extended size follows the type
            1 => {
                if offset + 16 > len {
                    break;
                }
                let mut ext = [0u8; 8];
                ext.copy_from_slice(&header[pos + 8..pos + 16]);
                u64::from_be_bytes(ext)
            }
            // atom runs to end of file
            0 => len - offset,
            n => n,
        };

        if atom_type == b"moov" {
            return Some((offset, atom_size));
        }
        // Sizes from the network are untrusted; stop at anything that
        // cannot fit in the bytes we hold.
        if atom_size < 8 || atom_size > len - offset {
            break;
        }
        offset += atom_size;
    }

    None
}
