/// Seed `CMakeLists.txt` written once when a project is created.
///
/// Every generated region is present and empty, so regenerating it with an
/// empty selection returns it unchanged.
pub const DEFAULT_TEMPLATE: &str = r##"cmake_minimum_required(VERSION 3.13)

set(PROJECT_NAME @PROJECT_NAME@)

set(CMAKE_SYSTEM_NAME Generic)
set(CMAKE_C_COMPILER ft32-elf-gcc)
set(CMAKE_ASM_COMPILER ft32-elf-gcc)

project(${PROJECT_NAME} C ASM)

if (NOT DEFINED TARGET)
    set(TARGET ft90x)
endif ()

file(GLOB PROJECT_SOURCES
    Sources/*.c
    # GENERATED: SOURCES - DO NOT MODIFY - BEGIN
    # GENERATED: SOURCES - DO NOT MODIFY - END
)

add_executable(${PROJECT_NAME}.elf ${PROJECT_SOURCES})

target_include_directories(${PROJECT_NAME}.elf PRIVATE
    Includes
    $ENV{FT9XX_TOOLCHAIN}/hardware/include
    # GENERATED: INCLUDES - DO NOT MODIFY - BEGIN
    # GENERATED: INCLUDES - DO NOT MODIFY - END
)

target_compile_options(${PROJECT_NAME}.elf PRIVATE
    -Wall -fmessage-length=0 -ffunction-sections -fdata-sections
    # GENERATED: DEFINITIONS - DO NOT MODIFY - BEGIN
    # GENERATED: DEFINITIONS - DO NOT MODIFY - END
    # GENERATED: CUSTOM DEFINITIONS - DO NOT MODIFY - BEGIN
    # GENERATED: CUSTOM DEFINITIONS - DO NOT MODIFY - END
)

if (${TARGET} MATCHES ft90x)
    set(LIB_FILES
        # GENERATED: PRE-COMPILE LIBS FT90X - DO NOT MODIFY - BEGIN
        # GENERATED: PRE-COMPILE LIBS FT90X - DO NOT MODIFY - END
    )
else (${TARGET} MATCHES ft93x)
    set(LIB_FILES
        # GENERATED: PRE-COMPILE LIBS FT93X - DO NOT MODIFY - BEGIN
        # GENERATED: PRE-COMPILE LIBS FT93X - DO NOT MODIFY - END
    )
endif ()

target_link_libraries(${PROJECT_NAME}.elf ${LIB_FILES})

target_link_options(${PROJECT_NAME}.elf PRIVATE
    -Wl,--gc-sections
    # GENERATED: CUSTOM LINKER FLAGS - DO NOT MODIFY - BEGIN
    # GENERATED: CUSTOM LINKER FLAGS - DO NOT MODIFY - END
)
"##;

const PROJECT_NAME_PLACEHOLDER: &str = "@PROJECT_NAME@";

/// The default template with the project name filled in.
pub fn seed_document(project_name: &str) -> String {
    DEFAULT_TEMPLATE.replace(PROJECT_NAME_PLACEHOLDER, project_name)
}
