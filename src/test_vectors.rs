//! Known-answer vectors from a real 1.5.0 container: scene 85342, version
//! "1.5.0", file name "pov_mask.asvr", frame 1111.

pub const SCENE_ID: u32 = 85342;
pub const VERSION: &[u8] = b"1.5.0";
pub const BASE_URL: &[u8] = b"pov_mask.asvr";
pub const FRAME_INDEX: u32 = 1111;

/// scrypt output for the scene above.
pub const DERIVED_KEY: &[u8; 32] = b"\x08vAc+\xa3x\x12\xb5\xc0\xd8\x8f|\x1a\xde#\xc9J\xe3\xc4\x12\xa2\xe2F\x15hYM!\x1a.\xfd";

/// Frame block as stored in the container.
pub const FRAME_CIPHERTEXT: &[u8] = b"\x1fR\x86y4\xff\x1b(\xcdo\x07\x02\xe0\x15o\xeb8\x9e\xb0m\xab\xcbf9\x91\xc5\xf8\xd8\xe8\x08<\xa6\x015\xe5h\xd0r(\xa7\x8bm\xe33_\xc0vd\x8b\xf5\xd6g\xa9\xe6\x07\xae\x9a\xb2k{}>:P]\xb8\xb8\xe5\x7f\x18V\x9c%\x04)\xbd\xb3o5!xbUi\x1f=kO\xcc\x8a\x83``\x87\x13\x87\x9fhc\xcf!\x04<\'vB\rW\x87\x93\x91\xcbH};\xean\xa1\xe7\xbbOM\xc8\xb1k\xa9f\xc9\xe8\x1eE,M\x0c\xd3\x8e-\x9c\x17\x80\x8f\xfd\x8a\x87(=o;p\xa0\xc3\x91\xe4\xfe\x1d$\xbe\x1e\x81H\xf2w\xd2f\x06Q\xd4\xffm\xee\xa1\x02\xc5,A\x0e\xafyyDg(&\xc1n\x01kz\xfa\xa4-\x0c\x05\xd4\xa2\xa6\x1f\xd2\xe4(\xe5\x1b\x07\x99\x00\xe6\xfb\xb4\x9d\xff\xd8-\x97\x94!\xb0\xf6uz\xaf;#~8\xdf\xc5\x16\x16e~\x13+jP+\x16\xe9\xcb\x14n^r\xc7\x10xR%v8\x08\x024k\xde\x0cC\x94\xc7\x19\xc1#$_\xeb\xb3\x82\x9fw\x8aO\x8c\x02:\x12\xc3o\xda\n\r\x05\xbch{\x15\xdb/\xf6n\xf3\xd0Z\xf2\x9cH\\:x\xb3\xb4\xcbH\xcb\x01{\xdb-\xd7$7\xab\xcaE\xd5e\xaaA\xac\x07\x01\x8e\x90\x00\xdbR\xd5`\xf6\xe4\xf7\x1d\xf7X\xf1\x1e\x1a\n\xed\xe8\x82\x90Q\xff,\xe7\xa7S\xfe\xeb\xe2 Cf\x0b\xcc#\x9a\x98a4\x7f+\x98)\xbd\x9f\x9c\xa8\xc1\x95 \xf2,7\nT\xa1\x8c\xdc~O\xe3\x80\x87M\xcf\xab\xda\x01\xce\xeb\xff\xf9\\\xdb\x1a\xd0pK\xb4\x90A\x90\x07)\xeb\x81\x08\xc5\xf8\x04l\xa1\"\xd9\xa3\xe5\x83\xa8$\x02nO2\x0fj\xff,\xd3\xc2\x88Y\xd3\xd9\xda\xecEW\x8b\x10\xf2\x1a7\x99\xabe\x96\xa9\x9e\xbd\xbb\x95\x99\x83\xe2\xf9X\xac\x81\xbeD\x16@>\r\r\x1d\xc1\xec\xcc\x82\xe1\xa9.\x02N\xe8\xed\x9b\xef\xe6l\x17\x0b\x96{\x92\x1eQ8B\x15\xec\x9e\x82\xe9\xc1-\xa2\x9f\xc79AMK:\x99\x14vm\xa3\xdf;\x00\xf9\'\xbb\x9a\xf5\xf2=?;\xd5\x8a\xab8\xec\xd3d2(\x89\xc0\x97bP[cK%\xc0\x11*\xae\xf4\t\x17\x85D\xae\x85\x8fS\xac\xa4\x1a\xdf\xbda\xfa\xc8-W\xca\x0b1\x93\x0e\x98.Z3\x7f<=\xfe\xc4\'\x1f\x05g[\xbaO\xf6_F\xc9\xaa\xc6\x8d\x9d\x1e\x1b?\xf8v\xee1$_\xe0\xf5UT{6n\xce\'\xdc\x93\xa1\x9eU\xc5";

/// Frame block after the keystream: length prefix + zlib stream.
pub const FRAME_PLAINTEXT: &[u8] = b"J\x03\x00\x00x\x9cM\x92K\x8e$5\x10\x86\xc3\x11~ef\xd7c\xaa\xba\x005\x0b\x06!$\xa4\xd9s\x16v\xdc\x83\x1b\xb0\x84\x03\xcc\x8a\xdb\xb0b\xc3\n\x8df4LKT\x89\xaeg>\x9cv\x84\x89\x96z\xc1\xe2w\xc8v8\xfc\xfbs\xdc\x01\x80\xff\x9f\xecK\x8c\xaa\xf5\xcb<\xbe\xc4\x1f\x0c\xc0O\xaa\xe2~#g\x02\xf6\x08\x82xE\x84jn\xd8\x9b\xbf\xd1\xc2\xc9|D$\xe0l> \x905\xc6y\x11\x066\xf8\x88\xc9\xfc\x85\xd1\xcc\xf2-\xfe\x8e\x85~6\x19\x98\xd8\x8cp\x98R}\x8fG{v\xbd;\xb7c<oN\x0fO\xdf\x08\x96\x08\x98\x16\xcf\x920\xbd\xaa\x8e\x1d\xd0\xb3\x84$\xceK\t`%\x08\x01\xcd\xeb\xd9\x97P\xec\xe4\x8e\xf1\x8f\xd5\xbbx\xaaW\x930\x13\xab\xbd\x11\xb3\x1d \x8b\x18\xa9F+\x14\xec\xf51cd\x1d\xb3O\xfe\xba\xea\x9bKs\x8a#\x0en\xf2}7\xac\xa5\x03G\x1e0\xb4\xbb\xcd\xc3f\x19\x10\x97\xf6M\xbc7\xf7\xf4%x\xd9\xcaw\x10\xc42\x82\xe3\xaf\x06\x0b-o\x07\x84\xed\xf4z\x1f8\xe4U\xb6\xac\xa5\xe6\xe5)p\x15W\x11\x0b\"6\xaekZ\x87\xd8Q\xf4\x01\x1dtNO\x13\xd9@\x11\xac\xb1du%\x00\n+\x8eg\xa3\" \xcd\x15\xde\xc2[Ns:\xffs}\x9f\x0f0I\x96\x0b\xfci\xb2\x9b\x1bh\'\xab8Z\xcd5\xa9~\xd2\xa7%3\xab\xb8N\x12~4\xcc\xef\xe6\xc7\xda\xf3\r\xce6\xc3\x85\x1e\xe3SS\xcc\xa9\xddo\xce[\xf6\xd9O+\xa6\xdb}Z\xe5P\xed\xed\x0bQ\xbb\xe3rZs\xa7\\\xbb\xf9\xde\xac\x8b\xf2\xac\x9e\t\xa2u\xca\x98\xaa\xe6_\xc2@\x192\xf5f\xef\x8ft\xad\xfb\xdcC/Opp3\xcc\x98\xe0c{\t}<\xec2\xed\xdb\x11G\xcbp\xf4\x97pX~z\xe8\xef\x86E^\xea?u~\xe1\xc3*\"\xee\xc2\x9b\xb8\x85\x1d\xb6\xd8\xdaN\t\x10yym<o\xcag\xc6V\xa3\x17Z\xe5\xf3}]\xe0\n\x16\xe5\xeb\xf20=\x9biK+\xafF/\x9fs\xe4\xa8\xf6B]\xdcB\xf13\xd5\x90\xec\xac\x92\x16:\xdb\xc6\xe6\xee\xae\tV\x9b\x8f\x10<\xed4l\xdd\x02\x1a\xd1\xfdje-\xfa\xf5\xbf\xc0\xafr\x94\xc25\x0f \\\xd29_d\x82\x99\x0b\x9fa\xd4nM\x94Y*+\xdb\xc9\x88\xad\x95\xb1j\xf2 \x8c\x0c\x03%s\xa5\x04)\x1c\xe2\xa8\x8d((\xf8o\x15\xf3\xe1?\x01\xc2W#";

/// Inflated payload: 12 record sizes followed by the records.
pub const FRAME_RECORDS: &[u8] = b"\x0c\x00\x00\x00\x06\x00\x00\x00\x06\x00\x00\x00\x06\x00\x00\x00\x04\x00\x00\x00\x06\x00\x00\x00\x08\x00\x00\x00\x10\x00\x00\x00\x04\x00\x00\x00\x08\x00\x00\x00\x04\x00\x00\x00X\x01\x00\x00z\x01\x00\x00\xfc\x05\xa4\x03\x05\x01\x07\x02\xf5\x02\x00\xfe\x02\x02\xf3\x02\x02\x00\xff\x01\xf4\x02\xf5\x01\xe4\x02\x04\x00\xf0\x01\xe3\x02\x02\x03\x00\xfd\xfb\x01\xe1\x02\x00\x03\x04\x01\x01\x05\x06\xfe\xfe\xfd\x00\xfd\x01\x02\xe6\x02\xf9\x01\xdc\x02\x08\x01\xfa\xfe%\x02\xcb\x02\xfc\x03\x89\x01\xfb\x00\xfd\x03\xfd\x01\xf7\x00\xeb\xf8\xf9\xff\xe0\x02\xef\x04\xf1\x05\xf5\x05\xf1\n\xf7\x08\xf1\x12\xf0\x1a\xee#\xfe\x02\xfc\x08\x00\x02\xf9\r\x00\x02\xf9\r\xfe\x07\xf8\x11\xff\x05\xfd\x05\x00\x03\xfd\x05\x00\x03\xfe\x03\xfe\x08\xfa\x0e\xfe\x07\x00\x04\xfe\x07\xfe\x03\x00\x03\xfa\x10\xfa\x06\xfc\x07\xfc\x04\xf8\x05\xef\x08\xd1\x0f\xde\x08\xf0\xff\xf3\x01\xf9\x02\xfb\x03\xfd\x00\xfe\x02\xf7\x02\xfb\x04\xf6\x00\xfb\xfe\xfe\x01\xfe\xff\x01\x05\xfd\x05\xfc\x02\xf5\x00\x00\x04\xf7\x08\xfd\x00\x00\x04\xfb\x06\xf9\x06\xf3\x0f\xf5\t\xf2\t\xf0\x08\xf7\x02\xf6\x05\xf8\x06\xf5\x0b\xf6\x10\xfe\x0b\x00\x05\x03\x06\x00\x02\x07\n\x15\x12\x1a\x12\x0e\x07\x02\x02\x0e\x04+\x08\x14\x01\x14\x03\x1b\x00\x06\xfe\x13\xfe(\x00\x07\xfe\x04\xfd\x02\x00\x05\xfd\x1f\xf6\x04\x00\n\xfd\x13\xf6\x02\x00\x13\xf8 \xea\x07\xfd\x07\xfb\x0f\xfb\x04\xfd\x08\xf7\x02\xfa\x0e\xf0\x07\xfd\xff\xfe\x05\xff\x02\x02\xfc\x02\x02\x02\t\x05\x0b\t\n\x05\x02\x02\x0b\x03\x08\x06\x07\x02\x05\x00\x0b\x05\x02\x00\x05\x03\x03\x04\x07\x03\x08\x00\x04\x01\x04\x03\x04\x00\x0b\x05\x07\x00\x02\xfe\xfd\xfd\x03\xfd\xfe\xfe\x01\xfe\xfe\xfe\x00\xfe\t\xf3\x00\x9e\x00\x9e\xfd\xf9\xfa\xf9\xf1\xe9\xf3\xe0\xfb\xeb\x00\xf8\xfe\xfb\xfe\xf2\x00\xd6\x01\xfb\x05\xfa\t\x00\n\xf8\x04\xff\x05\xfd\n\xfe\x01\xfe\x01\xf9\xff\xe5\x01\xfe\xff\xf9\x01\xfa\xff\xf9\x01\xfd\xff\xf8\xfe\x07_\x01\xfd\xfd\xde\xfa\xe6\xff\xf5\xfd\xf4\x00\xf1\x04\xfb\x00\xf2\x03\xe6\x08\xee\t\xfc\x01\xf0\n\xea\x12\xf1\x13\xfd\x06\xfb\x06\xf8\x0f\xfd\x03\xf4\x14\xf9\x0f\xfb\x07\xff\x04\xf4\x18\xfe\x02\xfa\x0e\xf7\x0e\xf8\x10\xfd\x0b\xfe\x03\xfe\x0b\xfa\x14\x01\x10\xfc\x10\xfa\x06\xff\x06\xfd\x03\x00\x08\x04\x05\x00\x04\xfe\x03\xff\x0f\xfd\x03\xf2\x07\xf6\x03\xfb\x00\xfb\x03\xf5\x01\xea\x06\xef\x03\xf3\xff\xea\xfb\xf5\x00\xf5\xfe\xee\x00\xeb\x05\xfa\x00\xfa\x02\xf9\x00\xe3\n\xf2\x07\xf5\x08\xeb\x15\xfb\x03\xea\n\xf7\x02\xf7\x04\xfd\x00\xef\x06\xf2\x07\xeb\x0e\xe5\x1a\xf5\x0c\xf6\r\xfb\x0e\xfe\x03\x00\x0b\x06\r\x06\x07\x0f\x08\x02\x02\x15\x07+\x08\x13\x00\x15\x02\n\x02\n\x04\x0b\x00\x04\x01\x03\x03\x06\xfe \x01\x06\xfd\x12\xfc\x16\x01\x04\xff\x01\xfe\x03\xff\x04\x00\x05\x036\xff\r\x02\x0f\x00\r\xfc!\xfc\x1a\xf8\x06\xfd\x03\x00\n\xfc\n\xfe\x11\xf7\x06\xfe\x17\xfd\x08\xfd\x08\xff\x06\xfd\x07\xff\r\xf4\x07\xfc\x06\xfa\x03\xff\x07\xf9\x04\xfa\x07\xf9\x04\xfe\n\x00\x0b\x04\n\x08\t\x0c\x0c\t\x07\x04\x02\x00\x03\x03\x02\x00\x06\x03\x15\x03\x03\x02\x13\x05\r\x00\t\xfe\x04\xfe\n\xff\x04\xfe\x10\xfe\x08\xfd\x00\x91\x00\x92\xfe\xef\xfe\xfc\xfd\xff\xfb\xf6\x00\xfe\xfd\xfc\xf9\xf1\xfb\xf2\xfe\xf8\x00\xfa\xfd\xfc\xfd\xf1\x00\xf7\xfe\xfd\x00\xf9\x03\xfb\xfd\xfe\xff\xfd\x01\xf9\xff\xf8\x01\xfe\x04\xff\xff\xfd\x02\xff\xfc\xfd\xff\xf6\xfe\xfd\x02\xfd\x00\xf6\x03\xf9\x01\xf3\x03\xf9\x00\xf9\x07\xeb\x08\xf7\x03\xfe\x08\xfe\x02\xfe\x02\xed\xff\xfe\x01\xe1";
