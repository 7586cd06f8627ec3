//! CUDA C source generation for the instruction payloads.
//!
//! Every generated kernel has the same entry signature,
//! `(unsigned int* buf, unsigned int value)`, and executes one low-level
//! operation [`OP_ITERS`] times per thread inside an unrolled loop. Plain
//! loads, stores, and ALU ops are issued through `asm volatile` so the
//! compiler cannot elide or coalesce them; atomic RMW ops use the CUDA
//! intrinsics, which are side-effecting and safe from elision. A sink store
//! that is never taken at runtime keeps each loop's results live.

/// Low-level operations executed per thread per launch.
pub const OP_ITERS: u32 = 4096;

/// Words in the group-local (shared) scratch array.
pub const LDS_WORDS: u32 = 1024;

/// Words in the device-global buffer the drivers allocate.
pub const GLOBAL_BUF_WORDS: u32 = 1 << 20;

/// Threads per block for every driver.
pub const BLOCK_SIZE: u32 = 256;

/// Blocks launched per multiprocessor.
pub const BLOCKS_PER_CU: u32 = 4;

/// Operand seed: `1.0h, 1.0h` as packed fp16, an ordinary constant for
/// integer ops. Keeps the fp16 variants on the normal-number fast path.
pub const SEED: u32 = 0x3c00_3c00;

/// One named operation variant within an instruction family.
#[derive(Debug, Clone, Copy)]
pub struct OpVariant {
    /// Kernel entry point and report label.
    pub name: &'static str,
    /// Statement executed once per loop iteration.
    pub body: &'static str,
    /// Minimum compute capability that legalizes the operation.
    pub min_cc: (u32, u32),
}

/// Shared-memory load kernel; `stride` words between consecutive lanes'
/// addresses provokes the bank-conflict pattern under test.
#[must_use]
pub fn shared_load_kernel(name: &str, stride: u32) -> String {
    let body = r#"asm volatile("ld.shared.u32 %0, [%1];" : "=r"(acc) : "r"(saddr));"#;
    shared_kernel(name, stride, body)
}

/// Shared-memory store kernel at the given lane stride.
#[must_use]
pub fn shared_store_kernel(name: &str, stride: u32) -> String {
    let body = r#"asm volatile("st.shared.u32 [%0], %1;" :: "r"(saddr), "r"(acc) : "memory");"#;
    shared_kernel(name, stride, body)
}

fn shared_kernel(name: &str, stride: u32, body: &str) -> String {
    format!(
        r#"
extern "C" __global__ void {name}(unsigned int* buf, unsigned int value) {{
    __shared__ unsigned int lds[{LDS_WORDS}u];
    const unsigned int tid = threadIdx.x;
    for (unsigned int i = tid; i < {LDS_WORDS}u; i += blockDim.x) {{
        lds[i] = value ^ i;
    }}
    __syncthreads();
    unsigned int* slot = &lds[(tid * {stride}u) % {LDS_WORDS}u];
    unsigned int saddr;
    asm volatile("{{ .reg .u64 t; cvta.to.shared.u64 t, %1; cvt.u32.u64 %0, t; }}"
                 : "=r"(saddr) : "l"(slot));
    unsigned int acc = value ^ tid;
    #pragma unroll 64
    for (unsigned int i = 0; i < {OP_ITERS}u; ++i) {{
        {body}
    }}
    if (acc == 0xffffffffu) buf[tid] = acc;
}}
"#
    )
}

/// Shared-memory atomic RMW kernel for one variant body.
#[must_use]
pub fn shared_atomic_kernel(variant: &OpVariant) -> String {
    let name = variant.name;
    let body = variant.body;
    format!(
        r#"
extern "C" __global__ void {name}(unsigned int* buf, unsigned int value) {{
    __shared__ unsigned int lds[{LDS_WORDS}u];
    const unsigned int tid = threadIdx.x;
    for (unsigned int i = tid; i < {LDS_WORDS}u; i += blockDim.x) {{
        lds[i] = value ^ i;
    }}
    __syncthreads();
    unsigned int* slot = &lds[tid % {LDS_WORDS}u];
    unsigned int acc = value ^ tid;
    #pragma unroll 16
    for (unsigned int i = 0; i < {OP_ITERS}u; ++i) {{
        {body}
    }}
    if (acc == 0xffffffffu) buf[tid] = acc;
}}
"#
    )
}

/// Global-memory atomic RMW kernel for one variant body.
///
/// Lanes target slots 32 words apart so the uncontended variants measure
/// the instruction itself rather than serialization on one line; the
/// contended variants name `buf` directly in their body.
#[must_use]
pub fn global_atomic_kernel(variant: &OpVariant) -> String {
    let name = variant.name;
    let body = variant.body;
    format!(
        r#"
extern "C" __global__ void {name}(unsigned int* buf, unsigned int value) {{
    const unsigned int gid = blockIdx.x * blockDim.x + threadIdx.x;
    unsigned int* slot = &buf[(gid * 32u) % {GLOBAL_BUF_WORDS}u];
    unsigned int acc = value ^ gid;
    #pragma unroll 16
    for (unsigned int i = 0; i < {OP_ITERS}u; ++i) {{
        {body}
    }}
    if (acc == 0xffffffffu) buf[gid % {GLOBAL_BUF_WORDS}u] = acc;
}}
"#
    )
}

/// Packed-format ALU kernel for one variant body. No memory traffic in the
/// timed loop; the dependent accumulator chain is the measurement.
#[must_use]
pub fn packed_math_kernel(variant: &OpVariant) -> String {
    let name = variant.name;
    let body = variant.body;
    format!(
        r#"
extern "C" __global__ void {name}(unsigned int* buf, unsigned int value) {{
    unsigned int a = value ^ (threadIdx.x * 0x9e3779b9u);
    unsigned int b = value | 0x00010001u;
    unsigned int c = threadIdx.x | 1u;
    #pragma unroll 64
    for (unsigned int i = 0; i < {OP_ITERS}u; ++i) {{
        {body}
    }}
    if ((a ^ c) == 0xffffffffu) buf[threadIdx.x] = a;
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_load_kernel_source() {
        let src = shared_load_kernel("ld_shared_u32_stride4", 4);
        assert!(src.contains(r#"extern "C" __global__ void ld_shared_u32_stride4"#));
        assert!(src.contains("ld.shared.u32"));
        assert!(src.contains("(tid * 4u) % 1024u"));
        assert!(src.contains("i < 4096u"));
    }

    #[test]
    fn test_shared_store_kernel_source() {
        let src = shared_store_kernel("st_shared_u32_stride32", 32);
        assert!(src.contains("st.shared.u32"));
        assert!(src.contains("(tid * 32u) % 1024u"));
    }

    #[test]
    fn test_atomic_kernels_embed_body() {
        let variant = OpVariant {
            name: "atomic_add_u32",
            body: "acc += atomicAdd(slot, value);",
            min_cc: (5, 2),
        };
        let shared = shared_atomic_kernel(&variant);
        assert!(shared.contains("atomicAdd(slot, value)"));
        assert!(shared.contains("__shared__ unsigned int lds"));

        let global = global_atomic_kernel(&variant);
        assert!(global.contains("atomicAdd(slot, value)"));
        assert!(global.contains("(gid * 32u) % 1048576u"));
        assert!(!global.contains("__shared__"));
    }

    #[test]
    fn test_packed_math_kernel_has_no_memory_loop() {
        let variant = OpVariant {
            name: "dp4a_u32",
            body: r#"asm volatile("dp4a.u32.u32 %0, %1, %2, %0;" : "+r"(a) : "r"(b), "r"(c));"#,
            min_cc: (6, 1),
        };
        let src = packed_math_kernel(&variant);
        assert!(src.contains("dp4a.u32.u32"));
        assert!(!src.contains("__shared__"));
        assert!(!src.contains("atomic"));
    }

    #[test]
    fn test_entry_signature_is_uniform() {
        let variant = OpVariant {
            name: "x",
            body: ";",
            min_cc: (5, 2),
        };
        for src in [
            shared_load_kernel("x", 1),
            shared_store_kernel("x", 1),
            shared_atomic_kernel(&variant),
            global_atomic_kernel(&variant),
            packed_math_kernel(&variant),
        ] {
            assert!(src.contains("void x(unsigned int* buf, unsigned int value)"));
        }
    }
}
